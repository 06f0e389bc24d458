use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::TableConfig;

/// Error type for table configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse table config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse table config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),
    #[error("invalid table config: {0}")]
    Invalid(String),
}

/// Parse and validate a table config from TOML text.
pub fn parse_config(text: &str) -> Result<TableConfig, ConfigError> {
    let config: TableConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Read the table config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
pub fn read_config(path: &Path) -> Result<(TableConfig, toml_edit::DocumentMut), ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = parse_config(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    fs::write(path, doc.to_string()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Persist a resized column width into the config document.
/// Returns false when no column with that id exists.
pub fn set_column_width(doc: &mut toml_edit::DocumentMut, column_id: &str, width: u16) -> bool {
    let Some(columns) = doc
        .get_mut("columns")
        .and_then(|item| item.as_array_of_tables_mut())
    else {
        return false;
    };
    for table in columns.iter_mut() {
        if table.get("id").and_then(|v| v.as_str()) == Some(column_id) {
            table["width"] = toml_edit::value(i64::from(width));
            return true;
        }
    }
    false
}

fn validate(config: &TableConfig) -> Result<(), ConfigError> {
    if config.table.pool_capacity == 0 {
        return Err(ConfigError::Invalid("pool_capacity must be at least 1".into()));
    }
    let mut seen = HashSet::new();
    for column in &config.columns {
        if column.id.trim().is_empty() {
            return Err(ConfigError::Invalid("column with empty id".into()));
        }
        if !seen.insert(column.id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate column id: {}",
                column.id
            )));
        }
        if column.min_width > column.width {
            return Err(ConfigError::Invalid(format!(
                "column {}: min_width {} exceeds width {}",
                column.id, column.min_width, column.width
            )));
        }
    }
    Ok(())
}
