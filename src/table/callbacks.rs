use chrono::NaiveDate;

use crate::model::{CellValue, TaskStatus};

/// Name of the fallback event dispatched on the surface root when a row is
/// expanded and no `on_row_expand` handler is registered.
pub const ROW_EXPAND_EVENT: &str = "row-expand";

/// Request to open the external status menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMenuRequest {
    pub row_id: String,
    pub column_id: String,
    pub current: TaskStatus,
}

/// Request to open the external date picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePickerRequest {
    pub row_id: String,
    pub column_id: String,
    pub current: Option<NaiveDate>,
}

type CellChangeFn = Box<dyn Fn(&str, &str, CellValue)>;
type DateChangeFn = Box<dyn Fn(&str, &str, Option<NaiveDate>)>;
type RowFn = Box<dyn Fn(&str)>;
type StatusClickFn = Box<dyn Fn(&StatusMenuRequest)>;
type DateClickFn = Box<dyn Fn(&DatePickerRequest)>;
type ResizeFn = Box<dyn Fn(&str, u16)>;

/// Outbound notifications toward the owning view. Every hook is optional.
#[derive(Default)]
pub struct TableCallbacks {
    on_cell_change: Option<CellChangeFn>,
    on_date_change: Option<DateChangeFn>,
    on_row_expand: Option<RowFn>,
    on_status_click: Option<StatusClickFn>,
    on_date_click: Option<DateClickFn>,
    on_column_resize: Option<ResizeFn>,
}

impl TableCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cell_change(mut self, f: impl Fn(&str, &str, CellValue) + 'static) -> Self {
        self.on_cell_change = Some(Box::new(f));
        self
    }

    pub fn on_date_change(mut self, f: impl Fn(&str, &str, Option<NaiveDate>) + 'static) -> Self {
        self.on_date_change = Some(Box::new(f));
        self
    }

    pub fn on_row_expand(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_row_expand = Some(Box::new(f));
        self
    }

    pub fn on_status_click(mut self, f: impl Fn(&StatusMenuRequest) + 'static) -> Self {
        self.on_status_click = Some(Box::new(f));
        self
    }

    pub fn on_date_click(mut self, f: impl Fn(&DatePickerRequest) + 'static) -> Self {
        self.on_date_click = Some(Box::new(f));
        self
    }

    pub fn on_column_resize(mut self, f: impl Fn(&str, u16) + 'static) -> Self {
        self.on_column_resize = Some(Box::new(f));
        self
    }

    pub(crate) fn cell_changed(&self, row_id: &str, column_id: &str, value: CellValue) {
        if let Some(f) = &self.on_cell_change {
            f(row_id, column_id, value);
        }
    }

    pub(crate) fn date_changed(&self, row_id: &str, column_id: &str, date: Option<NaiveDate>) {
        if let Some(f) = &self.on_date_change {
            f(row_id, column_id, date);
        }
    }

    /// Returns false when no handler is registered, so the caller can fall
    /// back to a surface event.
    pub(crate) fn row_expanded(&self, row_id: &str) -> bool {
        match &self.on_row_expand {
            Some(f) => {
                f(row_id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn status_clicked(&self, request: &StatusMenuRequest) {
        if let Some(f) = &self.on_status_click {
            f(request);
        }
    }

    pub(crate) fn date_clicked(&self, request: &DatePickerRequest) {
        if let Some(f) = &self.on_date_click {
            f(request);
        }
    }

    pub(crate) fn column_resized(&self, column_id: &str, width: u16) {
        if let Some(f) = &self.on_column_resize {
            f(column_id, width);
        }
    }
}
