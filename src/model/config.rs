use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::column::Column;

/// Configuration from a table TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub table: TableSettings,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    /// Maximum number of released rows kept for reuse
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
    /// Height of one row, the unit of the virtual-scroll spacer
    #[serde(default = "default_row_height")]
    pub row_height: u16,
    /// Column whose text has markup stripped and carries the tree affordances
    #[serde(default = "default_primary_column")]
    pub primary_column: String,
    /// Column that may display an inherited project
    #[serde(default = "default_project_column")]
    pub project_column: String,
    /// Text of the placeholder row shown when there are no rows
    #[serde(default = "default_empty_text")]
    pub empty_text: String,
    /// How long fetched autocomplete suggestions stay fresh
    #[serde(default = "default_suggestion_ttl_secs")]
    pub suggestion_ttl_secs: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            pool_capacity: default_pool_capacity(),
            row_height: default_row_height(),
            primary_column: default_primary_column(),
            project_column: default_project_column(),
            empty_text: default_empty_text(),
            suggestion_ttl_secs: default_suggestion_ttl_secs(),
        }
    }
}

fn default_pool_capacity() -> usize {
    50
}

fn default_row_height() -> u16 {
    32
}

fn default_primary_column() -> String {
    "description".into()
}

fn default_project_column() -> String {
    "project".into()
}

fn default_empty_text() -> String {
    "No tasks found".into()
}

fn default_suggestion_ttl_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme color overrides, keyed by theme slot (`background`, `red`, ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-tag colors for tag cells
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}
