pub mod config_io;
pub mod rows_io;
