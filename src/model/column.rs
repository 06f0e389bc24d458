use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Semantic type of a column, selects the cell renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Status,
    Priority,
    Date,
    Tags,
    Number,
    #[default]
    Text,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Status => "status",
            ColumnKind::Priority => "priority",
            ColumnKind::Date => "date",
            ColumnKind::Tags => "tags",
            ColumnKind::Number => "number",
            ColumnKind::Text => "text",
        }
    }
}

/// Horizontal alignment of a column's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn class_name(self) -> &'static str {
        match self {
            Align::Left => "align-left",
            Align::Center => "align-center",
            Align::Right => "align-right",
        }
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_min_width")]
    pub min_width: u16,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub align: Align,
}

/// Default: 16 cells
fn default_width() -> u16 {
    16
}

/// Default: 4 cells
fn default_min_width() -> u16 {
    4
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ColumnKind) -> Self {
        Column {
            id: id.into(),
            title: title.into(),
            kind,
            width: default_width(),
            min_width: default_min_width(),
            sortable: false,
            resizable: false,
            align: Align::default(),
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn min_width(mut self, min_width: u16) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Column definitions owned by the enclosing view. The table keeps a
/// handle to the same vector, so resizes are visible to the owner.
pub type SharedColumns = Rc<RefCell<Vec<Column>>>;

pub fn shared_columns(columns: Vec<Column>) -> SharedColumns {
    Rc::new(RefCell::new(columns))
}

/// Sort direction shown by a header's sort indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}
