pub mod io;
pub mod model;
pub mod surface;
pub mod table;
pub mod tui;
pub mod util;

pub use model::{Cell, CellValue, Column, ColumnKind, Row, SortDirection, TableConfig, TaskStatus};
pub use surface::{Document, Event, EventKind, Key, NodeId, Surface};
pub use table::{ReconcileReport, TableCallbacks, TaskTable};
