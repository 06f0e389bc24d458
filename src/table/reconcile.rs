use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::{debug, trace};

use super::cells::{CellRenderer, inputs_drifted};
use super::lifecycle::Lifecycle;
use super::listeners::ListenerRegistry;
use super::pool::RowPool;
use super::virtual_scroll::SPACER_CLASS;
use crate::model::{Cell, Column, Row};
use crate::surface::{Surface, Tag};

pub const ROW_ID_ATTR: &str = "data-row-id";
pub const ROW_CLASS: &str = "task-row";
pub const SELECTED_CLASS: &str = "is-selected";
pub const PLACEHOLDER_CLASS: &str = "task-row-empty";
pub const BODY_CLASS: &str = "task-table-body";

struct LiveRow<N> {
    node: N,
    fingerprint: u64,
}

/// What one reconcile pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rows that needed a container this pass (pooled or fresh)
    pub created: usize,
    /// Rows that kept their node from the previous pass
    pub reused: usize,
    /// Reused rows whose content changed and was rendered again
    pub repopulated: usize,
    /// Reused rows that had to be repositioned
    pub moved: usize,
    /// Rows released to the pool
    pub released: usize,
}

/// Keyed diff of the rendered rows against a new ordered row list.
///
/// Keeps an `id -> node` map in display order. Nodes of ids that survive
/// a pass are kept, nodes of vanished ids go back to the pool before any
/// new row is built so the same pass can reuse them.
pub struct RowReconciler<S: Surface> {
    body: Option<S::Node>,
    active: IndexMap<String, LiveRow<S::Node>>,
    pool: RowPool<S>,
    placeholder: Option<S::Node>,
    cells: CellRenderer,
    empty_text: String,
}

impl<S: Surface> RowReconciler<S> {
    pub fn new(cells: CellRenderer, pool_capacity: usize, empty_text: impl Into<String>) -> Self {
        RowReconciler {
            body: None,
            active: IndexMap::new(),
            pool: RowPool::new(pool_capacity),
            placeholder: None,
            cells,
            empty_text: empty_text.into(),
        }
    }

    pub fn body(&self) -> Option<S::Node> {
        self.body
    }

    pub fn row_node(&self, id: &str) -> Option<S::Node> {
        self.active.get(id).map(|live| live.node)
    }

    /// Ids of the rendered rows, in display order.
    pub fn row_ids(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn pool(&self) -> &RowPool<S> {
        &self.pool
    }

    pub fn placeholder(&self) -> Option<S::Node> {
        self.placeholder
    }

    /// Bring the body in line with `rows`. Does nothing when detached.
    pub fn reconcile(
        &mut self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        rows: &[Row],
        columns: &[Column],
        selected: &HashSet<String>,
        today: NaiveDate,
    ) -> ReconcileReport {
        let Some(body) = self.body else {
            debug!("reconcile skipped: table body is not attached");
            return ReconcileReport::default();
        };
        if rows.is_empty() {
            return self.show_empty(surface, listeners, body, columns.len());
        }
        self.remove_placeholder(surface);

        let mut report = ReconcileReport::default();
        let needed: HashSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let stale: Vec<String> = self
            .active
            .keys()
            .filter(|id| !needed.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(live) = self.active.shift_remove(&id) {
                trace!("release row {id}");
                self.pool.release(surface, listeners, live.node);
                report.released += 1;
            }
        }

        let origin = surface
            .children(body)
            .into_iter()
            .take_while(|&child| surface.has_class(child, SPACER_CLASS))
            .count();

        let mut next: IndexMap<String, LiveRow<S::Node>> = IndexMap::with_capacity(rows.len());
        let mut order: Vec<(S::Node, bool)> = Vec::with_capacity(rows.len());
        for row in rows {
            if next.contains_key(&row.id) {
                debug!("duplicate row id {} skipped", row.id);
                continue;
            }
            let fingerprint = fingerprint(row, columns, today);
            let previous = self.active.shift_remove(&row.id);
            let (node, fresh) = match previous {
                Some(live)
                    if surface.is_alive(live.node) && surface.parent(live.node) == Some(body) =>
                {
                    report.reused += 1;
                    if live.fingerprint != fingerprint || inputs_drifted(surface, live.node) {
                        trace!("repopulate row {}", row.id);
                        self.populate(surface, listeners, live.node, row, columns, today);
                        report.repopulated += 1;
                    }
                    (live.node, false)
                }
                previous => {
                    if let Some(lost) = previous {
                        trace!("row {} lost its node, rebuilding", row.id);
                        self.pool.release(surface, listeners, lost.node);
                    }
                    let node = self.pool.acquire(surface);
                    self.populate(surface, listeners, node, row, columns, today);
                    report.created += 1;
                    (node, true)
                }
            };
            surface.toggle_class(node, SELECTED_CLASS, selected.contains(&row.id));
            next.insert(row.id.clone(), LiveRow { node, fingerprint });
            order.push((node, fresh));
        }
        self.active = next;

        for (offset, (node, fresh)) in order.into_iter().enumerate() {
            let reference = surface.child_at(body, origin + offset);
            if reference != Some(node) {
                surface.insert_before(body, node, reference);
                if !fresh {
                    report.moved += 1;
                }
            }
        }

        debug!(
            "reconciled {} rows: {} created, {} reused ({} repopulated, {} moved), {} released, pool {}",
            self.active.len(),
            report.created,
            report.reused,
            report.repopulated,
            report.moved,
            report.released,
            self.pool.len()
        );
        report
    }

    /// Toggle the selection class on rendered rows without a reconcile.
    pub fn update_selection(&self, surface: &mut S, selected: &HashSet<String>) {
        let Some(body) = self.body else {
            debug!("selection update skipped: table body is not attached");
            return;
        };
        for child in surface.children(body) {
            let Some(id) = surface.attr(child, ROW_ID_ATTR).map(str::to_string) else {
                continue;
            };
            surface.toggle_class(child, SELECTED_CLASS, selected.contains(&id));
        }
    }

    fn populate(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        node: S::Node,
        row: &Row,
        columns: &[Column],
        today: NaiveDate,
    ) {
        surface.set_attr(node, ROW_ID_ATTR, &row.id);
        surface.set_attr(node, "data-level", &row.level.to_string());
        surface.set_attr(node, "data-expanded", bool_attr(row.expanded));
        surface.set_attr(node, "data-has-children", bool_attr(row.has_children));
        surface.set_class(node, ROW_CLASS);
        if let Some(class) = &row.class_name {
            surface.add_class(node, class);
        }

        for (index, column) in columns.iter().enumerate() {
            let target = match surface.child_at(node, index) {
                Some(existing) => existing,
                None => surface.append_new(node, Tag::Cell, ""),
            };
            let cell = cell_for(row, index, column);
            if cell.is_none() {
                trace!("row {} has no cell for column {}", row.id, column.id);
            }
            self.cells
                .render(surface, listeners, target, cell, column, row, today);
        }
        while let Some(extra) = surface.child_at(node, columns.len()) {
            listeners.detach_all(surface, extra);
            surface.destroy(extra);
        }
    }

    fn show_empty(
        &mut self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        body: S::Node,
        column_count: usize,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for (id, live) in self.active.drain(..) {
            trace!("release row {id}");
            self.pool.release(surface, listeners, live.node);
            report.released += 1;
        }

        let placeholder = self
            .placeholder
            .filter(|&p| surface.is_alive(p) && surface.parent(p) == Some(body));
        for child in surface.children(body) {
            if Some(child) != placeholder {
                listeners.detach_all(surface, child);
                surface.destroy(child);
            }
        }

        let placeholder = match placeholder {
            Some(p) => p,
            None => {
                let p = surface.append_new(body, Tag::Row, PLACEHOLDER_CLASS);
                surface.append_new(p, Tag::Cell, "task-cell-empty");
                p
            }
        };
        if let Some(cell) = surface.child_at(placeholder, 0) {
            surface.set_attr(cell, "colspan", &column_count.max(1).to_string());
            surface.set_text(cell, &self.empty_text);
        }
        self.placeholder = Some(placeholder);

        debug!("no rows to render, showing placeholder ({} released)", report.released);
        report
    }

    fn remove_placeholder(&mut self, surface: &mut S) {
        if let Some(placeholder) = self.placeholder.take() {
            surface.destroy(placeholder);
        }
    }
}

impl<S: Surface> Lifecycle<S> for RowReconciler<S> {
    /// Create the body section under `parent`.
    fn attach(&mut self, surface: &mut S, _listeners: &mut ListenerRegistry<S>, parent: S::Node) {
        if self.body.is_some() {
            return;
        }
        self.body = Some(surface.append_new(parent, Tag::Section, BODY_CLASS));
    }

    fn detach(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>) {
        for (_, live) in self.active.drain(..) {
            self.pool.release(surface, listeners, live.node);
        }
        self.pool.drain(surface);
        self.remove_placeholder(surface);
        if let Some(body) = self.body.take() {
            listeners.detach_all(surface, body);
            surface.destroy(body);
        }
    }
}

/// The row's cell for `column`: positional when the ids agree, else
/// looked up by id.
fn cell_for<'a>(row: &'a Row, index: usize, column: &Column) -> Option<&'a Cell> {
    row.cells
        .get(index)
        .filter(|c| c.column_id == column.id)
        .or_else(|| row.cells.iter().find(|c| c.column_id == column.id))
}

/// Content checksum of a rendered row. Selection is applied separately
/// and is not part of it.
fn fingerprint(row: &Row, columns: &[Column], today: NaiveDate) -> u64 {
    let mut hasher = DefaultHasher::new();
    row.hash(&mut hasher);
    columns.hash(&mut hasher);
    today.hash(&mut hasher);
    hasher.finish()
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
