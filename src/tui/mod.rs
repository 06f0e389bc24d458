//! Terminal rendering of a [`Document`](crate::surface::Document)-backed table.

pub mod theme;
pub mod view;

pub use theme::Theme;
pub use view::TableView;
