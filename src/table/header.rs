use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use super::callbacks::TableCallbacks;
use super::cells::COLUMN_ATTR;
use super::lifecycle::Lifecycle;
use super::listeners::ListenerRegistry;
use crate::model::{SharedColumns, SortDirection};
use crate::surface::{Event, EventKind, ListenerId, Surface, Tag, descendants};

pub const HEAD_CLASS: &str = "task-table-head";
pub const SORTED_CLASS: &str = "is-sorted";

/// An in-progress column resize
#[derive(Debug, Clone, PartialEq, Eq)]
struct Drag {
    column_id: String,
    start_x: i32,
    start_width: u16,
    min_width: u16,
    width: u16,
}

impl Drag {
    fn width_at(&self, x: i32) -> u16 {
        let wanted = i32::from(self.start_width).saturating_add(x.saturating_sub(self.start_x));
        let wanted = wanted.max(i32::from(self.min_width));
        u16::try_from(wanted).unwrap_or(u16::MAX)
    }
}

/// Renders the header row: titles, sort indicators and resize handles.
pub struct HeaderRenderer<S: Surface> {
    table: Option<S::Node>,
    head: Option<S::Node>,
    columns: SharedColumns,
    callbacks: Rc<TableCallbacks>,
    drag: Rc<RefCell<Option<Drag>>>,
    sort: Option<(String, SortDirection)>,
    pointer_bindings: Vec<ListenerId>,
}

impl<S: Surface> HeaderRenderer<S> {
    pub fn new(columns: SharedColumns, callbacks: Rc<TableCallbacks>) -> Self {
        HeaderRenderer {
            table: None,
            head: None,
            columns,
            callbacks,
            drag: Rc::new(RefCell::new(None)),
            sort: None,
            pointer_bindings: Vec::new(),
        }
    }

    pub fn head(&self) -> Option<S::Node> {
        self.head
    }

    /// Whether a resize drag is in progress.
    pub fn is_resizing(&self) -> bool {
        self.drag.borrow().is_some()
    }

    /// Rebuild the header row from the current column model.
    pub fn render(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>) {
        let Some(head) = self.head else {
            debug!("header render skipped: not attached");
            return;
        };
        listeners.detach_all(surface, head);
        surface.clear(head);

        let row = surface.append_new(head, Tag::Row, "task-header-row");
        let columns = self.columns.borrow();
        for column in columns.iter() {
            let th = surface.append_new(row, Tag::HeaderCell, "task-header-cell");
            surface.add_class(th, &format!("task-cell-{}", column.kind.as_str()));
            surface.add_class(th, column.align.class_name());
            surface.toggle_class(th, "is-sortable", column.sortable);
            surface.set_attr(th, COLUMN_ATTR, &column.id);
            surface.set_style(th, "width", &column.width.to_string());

            let title = surface.append_new(th, Tag::Span, "header-title");
            surface.set_text(title, &column.title);
            surface.append_new(th, Tag::Span, "sort-indicator");

            if column.resizable {
                let handle = surface.append_new(th, Tag::Span, "resize-handle");
                let drag = Rc::clone(&self.drag);
                let shared = Rc::clone(&self.columns);
                let column_id = column.id.clone();
                listeners.attach(surface, handle, EventKind::PointerDown, move |_: &mut S, event| {
                    let Event::PointerDown { x } = *event else {
                        return;
                    };
                    let columns = shared.borrow();
                    let Some(column) = columns.iter().find(|c| c.id == column_id) else {
                        return;
                    };
                    trace!("resize start {column_id} at {x}");
                    *drag.borrow_mut() = Some(Drag {
                        column_id: column_id.clone(),
                        start_x: x,
                        start_width: column.width,
                        min_width: column.min_width,
                        width: column.width,
                    });
                });
            }
        }
        drop(columns);

        if let Some((column_id, direction)) = self.sort.clone() {
            self.update_sort_indicators(surface, &column_id, direction);
        }
    }

    /// Show `direction` on `column_id` and clear every other indicator.
    pub fn update_sort_indicators(
        &mut self,
        surface: &mut S,
        column_id: &str,
        direction: SortDirection,
    ) {
        self.sort = Some((column_id.to_string(), direction));
        let Some(head) = self.head else {
            return;
        };
        for node in descendants(surface, head) {
            if surface.tag(node) != Some(Tag::HeaderCell) {
                continue;
            }
            let sorted = surface.attr(node, COLUMN_ATTR) == Some(column_id);
            surface.toggle_class(node, SORTED_CLASS, sorted);
            let indicator = surface
                .children(node)
                .into_iter()
                .find(|&c| surface.has_class(c, "sort-indicator"));
            if let Some(indicator) = indicator {
                let text = if sorted { direction.indicator() } else { "" };
                surface.set_text(indicator, text);
            }
        }
    }

    fn bind_pointer_tracking(
        &mut self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        table: S::Node,
    ) {
        let root = surface.root();

        let drag = Rc::clone(&self.drag);
        let on_move = listeners.attach(
            surface,
            root,
            EventKind::PointerMove,
            move |surface: &mut S, event| {
                let Event::PointerMove { x } = *event else {
                    return;
                };
                let mut drag = drag.borrow_mut();
                let Some(drag) = drag.as_mut() else {
                    return;
                };
                drag.width = drag.width_at(x);
                apply_width(surface, table, &drag.column_id, drag.width);
            },
        );

        let drag = Rc::clone(&self.drag);
        let columns = Rc::clone(&self.columns);
        let callbacks = Rc::clone(&self.callbacks);
        let on_up = listeners.attach(
            surface,
            root,
            EventKind::PointerUp,
            move |surface: &mut S, event| {
                let Event::PointerUp { x } = *event else {
                    return;
                };
                let Some(mut finished) = drag.borrow_mut().take() else {
                    return;
                };
                finished.width = finished.width_at(x);
                apply_width(surface, table, &finished.column_id, finished.width);
                if let Some(column) = columns
                    .borrow_mut()
                    .iter_mut()
                    .find(|c| c.id == finished.column_id)
                {
                    column.width = finished.width;
                }
                debug!("column {} resized to {}", finished.column_id, finished.width);
                if finished.width != finished.start_width {
                    callbacks.column_resized(&finished.column_id, finished.width);
                }
            },
        );

        self.pointer_bindings = vec![on_move, on_up];
    }
}

/// Set the live width of every header and body cell of a column.
fn apply_width<S: Surface>(surface: &mut S, table: S::Node, column_id: &str, width: u16) {
    let width = width.to_string();
    for node in descendants(surface, table) {
        let is_cell = matches!(surface.tag(node), Some(Tag::Cell | Tag::HeaderCell));
        if is_cell && surface.attr(node, COLUMN_ATTR) == Some(column_id) {
            surface.set_style(node, "width", &width);
        }
    }
}

impl<S: Surface> Lifecycle<S> for HeaderRenderer<S> {
    /// Create the head section as the first child of `parent` (the table).
    fn attach(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>, parent: S::Node) {
        if self.head.is_some() {
            return;
        }
        let head = surface.create(Tag::Section);
        surface.set_class(head, HEAD_CLASS);
        let first = surface.child_at(parent, 0);
        surface.insert_before(parent, head, first);
        self.table = Some(parent);
        self.head = Some(head);
        self.bind_pointer_tracking(surface, listeners, parent);
        self.render(surface, listeners);
    }

    fn detach(&mut self, surface: &mut S, listeners: &mut ListenerRegistry<S>) {
        let root = surface.root();
        for id in self.pointer_bindings.drain(..) {
            listeners.detach(surface, root, id);
        }
        self.drag.borrow_mut().take();
        self.table = None;
        if let Some(head) = self.head.take() {
            listeners.detach_all(surface, head);
            surface.destroy(head);
        }
    }
}
