use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Typed cell value, interpreted according to the column kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Checkbox symbol, e.g. `"x"` or `"/"`
    Status(String),
    Priority(Option<u8>),
    Date(Option<NaiveDate>),
    Tags(Vec<String>),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Status(s) | CellValue::Text(s) => s.hash(state),
            CellValue::Priority(p) => p.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Tags(tags) => tags.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Empty => {}
        }
    }
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Status(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Tags(tags) => tags.is_empty(),
            CellValue::Priority(p) => p.is_none(),
            CellValue::Date(d) => d.is_none(),
            _ => false,
        }
    }
}

/// A value inherited from a broader scope (e.g. a folder default)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inherited {
    pub value: String,
    /// Where the value comes from, shown in the indicator tooltip
    pub source: String,
}

/// One cell of a row; positionally matches one column
#[derive(Debug, Clone, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub column_id: String,
    #[serde(default)]
    pub value: CellValue,
    /// Pre-formatted string provided by the data layer
    #[serde(default)]
    pub display_value: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Effective value used when no explicit value is set
    #[serde(default)]
    pub inherited: Option<Inherited>,
}

impl Cell {
    pub fn new(column_id: impl Into<String>, value: CellValue) -> Self {
        Cell {
            column_id: column_id.into(),
            value,
            ..Default::default()
        }
    }

    pub fn display(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = display_value.into();
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn inherited(mut self, value: impl Into<String>, source: impl Into<String>) -> Self {
        self.inherited = Some(Inherited {
            value: value.into(),
            source: source.into(),
        });
        self
    }
}

/// A logical row. Rows are rebuilt upstream on every render call and are
/// only ever read by the renderer.
#[derive(Debug, Clone, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Row {
    /// Stable identity across render passes
    pub id: String,
    /// Tree depth (0 = top-level)
    #[serde(default)]
    pub level: usize,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Row {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn children(mut self, expanded: bool) -> Self {
        self.has_children = true;
        self.expanded = expanded;
        self
    }

    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }
}
