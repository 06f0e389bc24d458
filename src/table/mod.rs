//! The task table: keyed row reconciliation over a [`Surface`], with row
//! recycling, a virtual-scroll spacer and per-kind cell rendering.

pub mod callbacks;
pub mod cells;
pub mod header;
pub mod lifecycle;
pub mod listeners;
pub mod pool;
pub mod reconcile;
pub mod suggest;
pub mod virtual_scroll;

use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use log::debug;

pub use callbacks::{DatePickerRequest, ROW_EXPAND_EVENT, StatusMenuRequest, TableCallbacks};
pub use lifecycle::Lifecycle;
pub use listeners::ListenerRegistry;
pub use reconcile::ReconcileReport;
pub use suggest::{SuggestionError, SuggestionKind, SuggestionSource};

use crate::model::{
    CellValue, Column, Row, SharedColumns, SortDirection, TableConfig, TableSettings, TaskStatus,
    shared_columns,
};
use crate::surface::{Event, Surface, Tag};
use cells::CellRenderer;
use header::HeaderRenderer;
use reconcile::RowReconciler;
use suggest::SuggestionCache;
use virtual_scroll::VirtualScroll;

pub const TABLE_CLASS: &str = "task-table";

/// A recycling task table bound to one surface.
///
/// Renders are driven from outside: every call to [`render_rows`] brings
/// the surface in line with the given rows and nothing happens between
/// calls.
///
/// [`render_rows`]: TaskTable::render_rows
pub struct TaskTable<S: Surface> {
    surface: S,
    listeners: ListenerRegistry<S>,
    columns: SharedColumns,
    callbacks: Rc<TableCallbacks>,
    table: Option<S::Node>,
    header: HeaderRenderer<S>,
    rows: RowReconciler<S>,
    scroll: VirtualScroll<S>,
    suggestions: SuggestionCache,
    today: Option<NaiveDate>,
}

impl<S: Surface> TaskTable<S> {
    pub fn new(
        surface: S,
        columns: SharedColumns,
        settings: &TableSettings,
        callbacks: TableCallbacks,
    ) -> Self {
        let callbacks = Rc::new(callbacks);
        let cells = CellRenderer::new(
            settings.primary_column.as_str(),
            settings.project_column.as_str(),
            Rc::clone(&callbacks),
        );
        TaskTable {
            surface,
            listeners: ListenerRegistry::new(),
            header: HeaderRenderer::new(Rc::clone(&columns), Rc::clone(&callbacks)),
            rows: RowReconciler::new(cells, settings.pool_capacity, settings.empty_text.as_str()),
            scroll: VirtualScroll::new(settings.row_height),
            suggestions: SuggestionCache::new(Duration::from_secs(settings.suggestion_ttl_secs)),
            columns,
            callbacks,
            table: None,
            today: None,
        }
    }

    /// Build a table from a loaded configuration. The returned column
    /// handle is shared with the table.
    pub fn from_config(
        surface: S,
        config: TableConfig,
        callbacks: TableCallbacks,
    ) -> (Self, SharedColumns) {
        let columns = shared_columns(config.columns);
        let table = TaskTable::new(surface, Rc::clone(&columns), &config.table, callbacks);
        (table, columns)
    }

    /// Create the table under the surface root. Attaching twice is a no-op.
    pub fn attach(&mut self) {
        if self.table.is_some() {
            return;
        }
        let root = self.surface.root();
        let table = self.surface.append_new(root, Tag::Table, TABLE_CLASS);
        self.header.attach(&mut self.surface, &mut self.listeners, table);
        self.rows.attach(&mut self.surface, &mut self.listeners, table);
        if let Some(body) = self.rows.body() {
            self.scroll.attach(&mut self.surface, &mut self.listeners, body);
        }
        self.table = Some(table);
        debug!("task table attached");
    }

    /// Tear everything down: children first, then every remaining
    /// listener, the suggestion cache and the table node itself.
    pub fn detach(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        self.scroll.detach(&mut self.surface, &mut self.listeners);
        self.rows.detach(&mut self.surface, &mut self.listeners);
        self.header.detach(&mut self.surface, &mut self.listeners);
        let leftover = self.listeners.clear(&mut self.surface);
        if leftover > 0 {
            debug!("detached {leftover} stray listeners");
        }
        self.suggestions.clear();
        self.surface.destroy(table);
        debug!("task table detached");
    }

    pub fn is_attached(&self) -> bool {
        self.table.is_some()
    }

    /// Render `rows` in order, marking the ids in `selected`, with
    /// `scroll_start` rows represented by the leading spacer.
    pub fn render_rows(
        &mut self,
        rows: &[Row],
        selected: &HashSet<String>,
        scroll_start: i64,
    ) -> ReconcileReport {
        if self.table.is_none() {
            debug!("render skipped: table is not attached");
            return ReconcileReport::default();
        }
        let today = self.today();
        let columns = self.columns.borrow();
        if !rows.is_empty() {
            self.scroll.update(&mut self.surface, scroll_start, columns.len());
        }
        self.rows.reconcile(
            &mut self.surface,
            &mut self.listeners,
            rows,
            &columns,
            selected,
            today,
        )
    }

    /// Replace the column definitions and rebuild the header. Rows pick
    /// the change up on the next render.
    pub fn update_columns(&mut self, columns: Vec<Column>) {
        *self.columns.borrow_mut() = columns;
        self.header.render(&mut self.surface, &mut self.listeners);
    }

    pub fn update_selection(&mut self, selected: &HashSet<String>) {
        self.rows.update_selection(&mut self.surface, selected);
    }

    pub fn update_sort_indicators(&mut self, column_id: &str, direction: SortDirection) {
        self.header
            .update_sort_indicators(&mut self.surface, column_id, direction);
    }

    /// Result of the external status menu.
    pub fn select_status(&self, row_id: &str, column_id: &str, status: TaskStatus) {
        let symbol = status.symbol().to_string();
        self.callbacks
            .cell_changed(row_id, column_id, CellValue::Status(symbol));
    }

    /// Result of the external date picker. `None` clears the date.
    pub fn select_date(&self, row_id: &str, column_id: &str, date: Option<NaiveDate>) {
        self.callbacks.date_changed(row_id, column_id, date);
    }

    /// Deliver a host event to a node. Returns how many listeners ran.
    pub fn dispatch(&mut self, node: S::Node, event: &Event) -> usize {
        self.surface.dispatch(node, event)
    }

    /// Suggestions for an inline editor, fetched on first use.
    pub fn suggestions(&mut self, kind: SuggestionKind) -> Vec<String> {
        self.suggestions.get(kind)
    }

    pub fn set_suggestion_source(&mut self, source: impl SuggestionSource + 'static) {
        self.suggestions.set_source(source);
    }

    /// Pin the date used for relative date badges.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn columns(&self) -> SharedColumns {
        Rc::clone(&self.columns)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn table_node(&self) -> Option<S::Node> {
        self.table
    }

    pub fn head_node(&self) -> Option<S::Node> {
        self.header.head()
    }

    pub fn body_node(&self) -> Option<S::Node> {
        self.rows.body()
    }

    pub fn row_node(&self, id: &str) -> Option<S::Node> {
        self.rows.row_node(id)
    }

    /// Rendered row ids in display order.
    pub fn row_ids(&self) -> Vec<String> {
        self.rows.row_ids().map(str::to_string).collect()
    }

    pub fn pool_len(&self) -> usize {
        self.rows.pool().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
