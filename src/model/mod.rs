pub mod column;
pub mod config;
pub mod row;
pub mod status;

pub use column::*;
pub use config::*;
pub use row::*;
pub use status::*;
