use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Row;

/// Error type for row snapshot I/O
#[derive(Debug, thiserror::Error)]
pub enum RowsError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse rows: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Parse rows exported by a host view as a JSON array.
pub fn parse_rows(text: &str) -> Result<Vec<Row>, RowsError> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_rows(path: &Path) -> Result<Vec<Row>, RowsError> {
    let text = fs::read_to_string(path).map_err(|e| RowsError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_rows(&text)
}

/// Serialize rows as pretty JSON, the format `parse_rows` reads.
pub fn rows_to_json(rows: &[Row]) -> Result<String, RowsError> {
    Ok(serde_json::to_string_pretty(rows)?)
}
