use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::NaiveDate;

use super::callbacks::{DatePickerRequest, ROW_EXPAND_EVENT, StatusMenuRequest, TableCallbacks};
use super::listeners::ListenerRegistry;
use crate::model::{Align, Cell, CellValue, Column, ColumnKind, Priority, Row, TaskStatus};
use crate::surface::{Event, EventKind, Key, Surface, Tag, descendants};
use crate::util::dates::{DateBadge, format_date};
use crate::util::markup::strip_markup;

/// Placeholder keeping empty cells the same height as filled ones
pub const EMPTY_PLACEHOLDER: &str = "\u{a0}";
/// Glyph appended to values inherited from a broader scope
pub const INHERITED_GLYPH: &str = "↳";
pub const COLUMN_ATTR: &str = "data-column-id";
/// Value an inline input was rendered with
pub const RENDERED_VALUE_ATTR: &str = "data-rendered-value";

/// Populates cell containers according to their column kind and wires
/// the inline-edit affordances.
pub struct CellRenderer {
    primary_column: String,
    project_column: String,
    callbacks: Rc<TableCallbacks>,
}

impl CellRenderer {
    pub fn new(
        primary_column: impl Into<String>,
        project_column: impl Into<String>,
        callbacks: Rc<TableCallbacks>,
    ) -> Self {
        CellRenderer {
            primary_column: primary_column.into(),
            project_column: project_column.into(),
            callbacks,
        }
    }

    /// Clear `target` (listeners included) and render `cell` into it.
    /// A missing cell leaves the container empty.
    #[allow(clippy::too_many_arguments)]
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: Option<&Cell>,
        column: &Column,
        row: &Row,
        today: NaiveDate,
    ) {
        listeners.detach_all(surface, target);
        surface.clear(target);
        surface.set_text(target, "");

        let align = match column.kind {
            ColumnKind::Number => Align::Right,
            _ => column.align,
        };
        surface.set_class(target, &format!("task-cell task-cell-{}", column.kind.as_str()));
        surface.add_class(target, align.class_name());
        surface.set_attr(target, COLUMN_ATTR, &column.id);
        surface.set_style(target, "width", &column.width.to_string());

        if column.id == self.primary_column {
            self.render_tree_affordance(surface, listeners, target, row);
        }

        let Some(cell) = cell else {
            return;
        };
        if let Some(class) = &cell.class_name {
            surface.add_class(target, class);
        }

        match column.kind {
            ColumnKind::Status => self.render_status(surface, listeners, target, cell, row),
            ColumnKind::Priority => self.render_priority(surface, listeners, target, cell, row),
            ColumnKind::Date => self.render_date(surface, listeners, target, cell, row, today),
            ColumnKind::Tags => self.render_tags(surface, listeners, target, cell, row),
            ColumnKind::Number => render_number(surface, target, cell),
            ColumnKind::Text => self.render_text(surface, listeners, target, cell, column, row),
        }
    }

    fn render_tree_affordance<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        row: &Row,
    ) {
        if row.level > 0 {
            let indent = surface.append_new(target, Tag::Span, "tree-indent");
            surface.set_text(indent, &"  ".repeat(row.level));
        }
        if !row.has_children {
            let leaf = surface.append_new(target, Tag::Span, "tree-leaf");
            surface.set_text(leaf, "  ");
            return;
        }

        let toggle = surface.append_new(target, Tag::Button, "tree-toggle");
        surface.set_text(toggle, if row.expanded { "▾ " } else { "▸ " });
        let callbacks = Rc::clone(&self.callbacks);
        let row_id = row.id.clone();
        listeners.attach(surface, toggle, EventKind::Click, move |surface: &mut S, _| {
            if !callbacks.row_expanded(&row_id) {
                let root = surface.root();
                surface.dispatch(root, &Event::custom(ROW_EXPAND_EVENT, row_id.as_str()));
            }
        });
    }

    fn render_status<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: &Cell,
        row: &Row,
    ) {
        let symbol = match &cell.value {
            CellValue::Status(s) => s.as_str(),
            _ => cell.display_value.as_str(),
        };
        let status = TaskStatus::from_symbol(symbol);
        let tag = if cell.editable { Tag::Button } else { Tag::Span };
        let badge = surface.append_new(target, tag, "status-badge");
        surface.add_class(badge, status.class_name());
        surface.set_attr(badge, "title", status.label());
        let icon = surface.append_new(badge, Tag::Span, "status-icon");
        surface.set_text(icon, &format!("{} ", status.icon()));
        let label = surface.append_new(badge, Tag::Span, "status-label");
        surface.set_text(label, status.label());

        if cell.editable {
            let callbacks = Rc::clone(&self.callbacks);
            let request = StatusMenuRequest {
                row_id: row.id.clone(),
                column_id: cell.column_id.clone(),
                current: status,
            };
            listeners.attach(surface, badge, EventKind::Click, move |_: &mut S, _| {
                callbacks.status_clicked(&request);
            });
        }
    }

    fn render_priority<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: &Cell,
        row: &Row,
    ) {
        let level = match cell.value {
            CellValue::Priority(level) => level.and_then(Priority::from_level),
            _ => None,
        };

        match level {
            Some(priority) => {
                let icon = surface.append_new(target, Tag::Span, "priority-icon");
                surface.set_text(icon, &format!("{} ", priority.icon()));
                surface.set_attr(icon, "title", priority.label());
                surface.add_class(target, &format!("priority-{}", priority.label().to_lowercase()));
                if !cell.editable {
                    let label = surface.append_new(target, Tag::Span, "priority-label");
                    surface.set_text(label, priority.label());
                }
            }
            None => {
                let empty = surface.append_new(target, Tag::Span, "priority-none");
                surface.set_text(empty, EMPTY_PLACEHOLDER);
            }
        }

        if cell.editable {
            let shown = level.map(|p| (p as u8).to_string()).unwrap_or_default();
            let input = surface.append_new(target, Tag::Input, "priority-input");
            surface.set_value(input, &shown);
            let callbacks = Rc::clone(&self.callbacks);
            let (row_id, column_id) = (row.id.clone(), cell.column_id.clone());
            bind_inline_edit(surface, listeners, input, shown, move |previous, next| {
                let next = Priority::coerce(next);
                if Priority::coerce(previous) == next {
                    return false;
                }
                callbacks.cell_changed(&row_id, &column_id, CellValue::Priority(next));
                true
            });
        }
    }

    fn render_date<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: &Cell,
        row: &Row,
        today: NaiveDate,
    ) {
        let date = match cell.value {
            CellValue::Date(date) => date,
            _ => None,
        };
        let text = match date {
            _ if !cell.display_value.is_empty() => cell.display_value.clone(),
            Some(d) => format_date(d),
            None => EMPTY_PLACEHOLDER.to_string(),
        };

        let tag = if cell.editable { Tag::Button } else { Tag::Span };
        let label = surface.append_new(target, tag, "date-text");
        surface.set_text(label, &text);

        if let Some(badge) = date.and_then(|d| DateBadge::relative_to(d, today)) {
            let node = surface.append_new(target, Tag::Span, "date-badge");
            surface.add_class(node, badge.class_name());
            surface.set_text(node, &format!(" {}", badge.label()));
            if badge == DateBadge::Overdue {
                surface.add_class(target, "is-overdue");
            }
        }

        if cell.editable {
            let callbacks = Rc::clone(&self.callbacks);
            let request = DatePickerRequest {
                row_id: row.id.clone(),
                column_id: cell.column_id.clone(),
                current: date,
            };
            listeners.attach(surface, label, EventKind::Click, move |_: &mut S, _| {
                callbacks.date_clicked(&request);
            });
        }
    }

    fn render_tags<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: &Cell,
        row: &Row,
    ) {
        let joined = match &cell.value {
            CellValue::Tags(tags) => tags.join(", "),
            _ => cell.display_value.clone(),
        };

        if !cell.editable {
            let text = surface.append_new(target, Tag::Span, "tags-text");
            let shown = if joined.is_empty() {
                EMPTY_PLACEHOLDER
            } else {
                joined.as_str()
            };
            surface.set_text(text, shown);
            return;
        }

        let input = surface.append_new(target, Tag::Input, "tags-input");
        surface.set_value(input, &joined);
        let callbacks = Rc::clone(&self.callbacks);
        let (row_id, column_id) = (row.id.clone(), cell.column_id.clone());
        bind_inline_edit(surface, listeners, input, joined, move |previous, next| {
            let next = split_tags(next);
            if same_tag_set(&split_tags(previous), &next) {
                return false;
            }
            callbacks.cell_changed(&row_id, &column_id, CellValue::Tags(next));
            true
        });
    }

    fn render_text<S: Surface>(
        &self,
        surface: &mut S,
        listeners: &mut ListenerRegistry<S>,
        target: S::Node,
        cell: &Cell,
        column: &Column,
        row: &Row,
    ) {
        let explicit = if cell.display_value.is_empty() {
            cell.value.as_text().unwrap_or_default().to_string()
        } else {
            cell.display_value.clone()
        };
        let explicit = if column.id == self.primary_column {
            strip_markup(&explicit)
        } else {
            explicit
        };

        let inherited = cell
            .inherited
            .as_ref()
            .filter(|_| column.id == self.project_column && explicit.trim().is_empty());
        let shown = inherited.map_or(explicit, |inh| inh.value.clone());

        if cell.editable && inherited.is_none() {
            let input = surface.append_new(target, Tag::Input, "text-input");
            surface.set_value(input, &shown);
            let callbacks = Rc::clone(&self.callbacks);
            let (row_id, column_id) = (row.id.clone(), cell.column_id.clone());
            bind_inline_edit(surface, listeners, input, shown, move |previous, next| {
                if previous == next {
                    return false;
                }
                callbacks.cell_changed(&row_id, &column_id, CellValue::Text(next.to_string()));
                true
            });
        } else {
            let text = surface.append_new(target, Tag::Span, "text-value");
            surface.set_text(text, &shown);
        }

        if let Some(inh) = inherited {
            surface.add_class(target, "is-inherited");
            surface.set_attr(target, "aria-readonly", "true");
            let glyph = surface.append_new(target, Tag::Span, "inherited-indicator");
            surface.set_text(glyph, &format!(" {INHERITED_GLYPH}"));
            surface.set_attr(glyph, "title", &format!("Inherited from {}", inh.source));
        }
    }
}

fn render_number<S: Surface>(surface: &mut S, target: S::Node, cell: &Cell) {
    let text = match (&cell.value, cell.display_value.is_empty()) {
        (CellValue::Number(n), true) => n.to_string(),
        (_, true) => EMPTY_PLACEHOLDER.to_string(),
        (_, false) => cell.display_value.clone(),
    };
    let span = surface.append_new(target, Tag::Span, "number-value");
    surface.set_text(span, &text);
}

/// Wire blur/Enter commit and Escape revert on an inline input.
///
/// `commit(previous, next)` fires the outbound callback when the value
/// really changed and reports whether it did; the shown value is updated
/// only then, so a blur following an Enter does not commit twice.
fn bind_inline_edit<S, F>(
    surface: &mut S,
    listeners: &mut ListenerRegistry<S>,
    input: S::Node,
    shown: String,
    commit: F,
) where
    S: Surface,
    F: Fn(&str, &str) -> bool + 'static,
{
    surface.set_attr(input, RENDERED_VALUE_ATTR, &shown);
    let shown = Rc::new(RefCell::new(shown));
    let commit: Rc<dyn Fn(&str, &str) -> bool> = Rc::new(commit);

    let (on_blur_shown, on_blur_commit) = (Rc::clone(&shown), Rc::clone(&commit));
    listeners.attach(surface, input, EventKind::Blur, move |surface: &mut S, _| {
        commit_input(surface, input, &on_blur_shown, on_blur_commit.as_ref());
    });

    listeners.attach(surface, input, EventKind::Key, move |surface: &mut S, event| match event {
        Event::Key(Key::Enter) => commit_input(surface, input, &shown, commit.as_ref()),
        Event::Key(Key::Escape) => {
            let previous = shown.borrow().clone();
            surface.set_value(input, &previous);
        }
        _ => {}
    });
}

fn commit_input<S: Surface>(
    surface: &S,
    input: S::Node,
    shown: &RefCell<String>,
    commit: &dyn Fn(&str, &str) -> bool,
) {
    let Some(next) = surface.value(input).map(str::to_string) else {
        return;
    };
    let previous = shown.borrow().clone();
    if commit(&previous, &next) {
        *shown.borrow_mut() = next;
    }
}

/// Whether any inline input under `node` holds something other than the
/// value it was rendered with, e.g. an edit the data layer did not accept.
pub fn inputs_drifted<S: Surface>(surface: &S, node: S::Node) -> bool {
    descendants(surface, node).into_iter().any(|n| {
        surface.tag(n) == Some(Tag::Input)
            && surface.value(n) != surface.attr(n, RENDERED_VALUE_ATTR)
    })
}

/// Split comma-separated tag input, trimming and dropping empties.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Order-insensitive tag comparison
pub fn same_tag_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Document, NodeId, text_content};
    use std::cell::RefCell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    type Changes = Rc<RefCell<Vec<(String, String, CellValue)>>>;

    fn renderer() -> (CellRenderer, Changes) {
        let changes: Changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let callbacks = TableCallbacks::new().on_cell_change(move |row, col, value| {
            sink.borrow_mut().push((row.to_string(), col.to_string(), value));
        });
        (CellRenderer::new("description", "project", Rc::new(callbacks)), changes)
    }

    fn render_one(
        renderer: &CellRenderer,
        doc: &mut Document,
        registry: &mut ListenerRegistry<Document>,
        column: &Column,
        cell: &Cell,
        row: &Row,
    ) -> NodeId {
        let root = doc.root();
        let target = doc.append_new(root, Tag::Cell, "");
        renderer.render(doc, registry, target, Some(cell), column, row, today());
        target
    }

    fn find(doc: &Document, node: NodeId, class: &str) -> Option<NodeId> {
        crate::surface::descendants(doc, node)
            .into_iter()
            .find(|&n| doc.has_class(n, class))
    }

    #[test]
    fn status_uses_symbol_mapping() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("status", "Status", ColumnKind::Status);
        let cell = Cell::new("status", CellValue::Status("/".into()));
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("a"));
        assert_eq!(text_content(&doc, target), "◐ In progress");
        assert!(find(&doc, target, "status-in-progress").is_some());
        assert!(registry.is_empty());

        let cell = Cell::new("status", CellValue::Status("?".into()));
        r.render(&mut doc, &mut registry, target, Some(&cell), &column, &Row::new("a"), today());
        assert_eq!(text_content(&doc, target), "○ Not started");
    }

    #[test]
    fn status_click_opens_menu() {
        let opened = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&opened);
        let callbacks = TableCallbacks::new().on_status_click(move |req| {
            *sink.borrow_mut() = Some(req.clone());
        });
        let r = CellRenderer::new("description", "project", Rc::new(callbacks));
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("status", "Status", ColumnKind::Status);
        let cell = Cell::new("status", CellValue::Status("x".into())).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("t1"));

        let badge = find(&doc, target, "status-badge").unwrap();
        assert_eq!(doc.dispatch(badge, &Event::Click), 1);
        let req = opened.borrow().clone().unwrap();
        assert_eq!(req.row_id, "t1");
        assert_eq!(req.current, TaskStatus::Completed);
    }

    #[test]
    fn priority_placeholder_when_absent() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("priority", "Priority", ColumnKind::Priority);

        let none = Cell::new("priority", CellValue::Priority(None));
        let target = render_one(&r, &mut doc, &mut registry, &column, &none, &Row::new("a"));
        assert_eq!(text_content(&doc, target), EMPTY_PLACEHOLDER);

        let high = Cell::new("priority", CellValue::Priority(Some(4)));
        let target = render_one(&r, &mut doc, &mut registry, &column, &high, &Row::new("a"));
        assert_eq!(text_content(&doc, target), "⏫ High");

        let bogus = Cell::new("priority", CellValue::Priority(Some(9)));
        let target = render_one(&r, &mut doc, &mut registry, &column, &bogus, &Row::new("a"));
        assert_eq!(text_content(&doc, target), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn editable_priority_keeps_placeholder() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("priority", "Priority", ColumnKind::Priority);
        let cell = Cell::new("priority", CellValue::Priority(None)).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("a"));

        let empty = find(&doc, target, "priority-none").unwrap();
        assert_eq!(doc.text(empty), EMPTY_PLACEHOLDER);
        let input = find(&doc, target, "priority-input").unwrap();
        assert_eq!(doc.value(input), Some(""));
    }

    #[test]
    fn priority_edit_coerces_garbage_to_none() {
        let (r, changes) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("priority", "Priority", ColumnKind::Priority);
        let cell = Cell::new("priority", CellValue::Priority(Some(2))).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("a"));
        let input = find(&doc, target, "priority-input").unwrap();

        doc.set_value(input, "urgent");
        doc.dispatch(input, &Event::Blur);
        assert_eq!(
            changes.borrow().as_slice(),
            &[("a".to_string(), "priority".to_string(), CellValue::Priority(None))]
        );
    }

    #[test]
    fn date_badge_tomorrow() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("due", "Due", ColumnKind::Date);
        let tomorrow = today().succ_opt().unwrap();
        let cell = Cell::new("due", CellValue::Date(Some(tomorrow)));
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("a"));
        let badge = find(&doc, target, "date-badge").unwrap();
        assert_eq!(doc.text(badge).trim(), "Tomorrow");
        assert_eq!(text_content(&doc, target), "2025-03-11 Tomorrow");
    }

    #[test]
    fn overdue_date_marks_cell() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("due", "Due", ColumnKind::Date);
        let cell = Cell::new("due", CellValue::Date(NaiveDate::from_ymd_opt(2025, 1, 2)))
            .display("Jan 2");
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("a"));
        assert!(doc.has_class(target, "is-overdue"));
        assert_eq!(text_content(&doc, target), "Jan 2 Overdue");
    }

    #[test]
    fn tags_commit_is_order_insensitive() {
        let (r, changes) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("tags", "Tags", ColumnKind::Tags);
        let cell =
            Cell::new("tags", CellValue::Tags(vec!["x".into(), "y".into()])).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        let input = find(&doc, target, "tags-input").unwrap();
        assert_eq!(doc.value(input), Some("x, y"));

        doc.set_value(input, "y, x");
        doc.dispatch(input, &Event::Blur);
        assert!(changes.borrow().is_empty());

        doc.set_value(input, "y");
        doc.dispatch(input, &Event::Blur);
        assert_eq!(
            changes.borrow().as_slice(),
            &[("r1".to_string(), "tags".to_string(), CellValue::Tags(vec!["y".into()]))]
        );
    }

    #[test]
    fn enter_then_blur_commits_once() {
        let (r, changes) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("tags", "Tags", ColumnKind::Tags);
        let cell = Cell::new("tags", CellValue::Tags(vec!["x".into()])).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        let input = find(&doc, target, "tags-input").unwrap();

        doc.set_value(input, "x, , z ,");
        doc.dispatch(input, &Event::Key(Key::Enter));
        doc.dispatch(input, &Event::Blur);
        let changes = changes.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].2, CellValue::Tags(vec!["x".into(), "z".into()]));
    }

    #[test]
    fn escape_reverts_input() {
        let (r, changes) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("notes", "Notes", ColumnKind::Text);
        let cell = Cell::new("notes", CellValue::Text("draft".into())).editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        let input = find(&doc, target, "text-input").unwrap();

        doc.set_value(input, "typo");
        doc.dispatch(input, &Event::Key(Key::Escape));
        doc.dispatch(input, &Event::Blur);
        assert_eq!(doc.value(input), Some("draft"));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn read_only_tags_are_one_text_node() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("tags", "Tags", ColumnKind::Tags);
        let cell = Cell::new("tags", CellValue::Tags(vec!["a".into(), "b".into(), "c".into()]));
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        assert_eq!(doc.child_count(target), 1);
        assert_eq!(text_content(&doc, target), "a, b, c");
    }

    #[test]
    fn number_is_right_aligned() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("est", "Estimate", ColumnKind::Number);
        let cell = Cell::new("est", CellValue::Number(2.5)).display("2.5h");
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        assert!(doc.has_class(target, "align-right"));
        assert_eq!(text_content(&doc, target), "2.5h");
    }

    #[test]
    fn primary_text_strips_markup_and_compares_shown_value() {
        let (r, changes) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("description", "Task", ColumnKind::Text);
        let cell = Cell::new("description", CellValue::Text("Fix **login** [[Auth|auth]]".into()))
            .editable();
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));
        let input = find(&doc, target, "text-input").unwrap();
        assert_eq!(doc.value(input), Some("Fix login auth"));

        doc.dispatch(input, &Event::Blur);
        assert!(changes.borrow().is_empty());

        doc.set_value(input, "Fix logout");
        doc.dispatch(input, &Event::Key(Key::Enter));
        assert_eq!(changes.borrow()[0].2, CellValue::Text("Fix logout".into()));
    }

    #[test]
    fn inherited_project_is_read_only_with_indicator() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("project", "Project", ColumnKind::Text);
        let cell = Cell::new("project", CellValue::Text(String::new()))
            .editable()
            .inherited("Website", "folder Work/Website");
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &Row::new("r1"));

        assert!(find(&doc, target, "text-input").is_none());
        assert!(doc.has_class(target, "is-inherited"));
        let glyph = find(&doc, target, "inherited-indicator").unwrap();
        assert_eq!(doc.attr(glyph, "title"), Some("Inherited from folder Work/Website"));
        assert_eq!(text_content(&doc, target), format!("Website {INHERITED_GLYPH}"));
        assert!(registry.is_empty());
    }

    #[test]
    fn rerender_clears_previous_kind() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let tags = Column::new("c", "C", ColumnKind::Tags);
        let cell = Cell::new("c", CellValue::Tags(vec!["x".into()])).editable();
        let target = render_one(&r, &mut doc, &mut registry, &tags, &cell, &Row::new("r1"));
        assert_eq!(registry.len(), 2);

        let number = Column::new("c", "C", ColumnKind::Number);
        let cell = Cell::new("c", CellValue::Number(3.0));
        r.render(&mut doc, &mut registry, target, Some(&cell), &number, &Row::new("r1"), today());
        assert!(registry.is_empty());
        assert!(find(&doc, target, "tags-input").is_none());
        assert!(!doc.has_class(target, "task-cell-tags"));
        assert_eq!(text_content(&doc, target), "3");
    }

    #[test]
    fn expand_toggle_falls_back_to_surface_event() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let root = doc.root();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        registry.attach(&mut doc, root, EventKind::Custom, move |_, event| {
            if let Event::Custom { name, detail } = event {
                sink.borrow_mut().push((name.clone(), detail.clone()));
            }
        });

        let column = Column::new("description", "Task", ColumnKind::Text);
        let row = Row::new("parent").level(1).children(false);
        let cell = Cell::new("description", CellValue::Text("Parent".into()));
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &row);
        assert_eq!(text_content(&doc, target), "  ▸ Parent");

        let toggle = find(&doc, target, "tree-toggle").unwrap();
        doc.dispatch(toggle, &Event::Click);
        assert_eq!(
            seen.borrow().as_slice(),
            &[(ROW_EXPAND_EVENT.to_string(), "parent".to_string())]
        );
    }

    #[test]
    fn expand_toggle_prefers_callback() {
        let expanded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&expanded);
        let callbacks =
            TableCallbacks::new().on_row_expand(move |id| sink.borrow_mut().push(id.to_string()));
        let r = CellRenderer::new("description", "project", Rc::new(callbacks));
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let column = Column::new("description", "Task", ColumnKind::Text);
        let row = Row::new("p").children(true);
        let cell = Cell::new("description", CellValue::Text("P".into()));
        let target = render_one(&r, &mut doc, &mut registry, &column, &cell, &row);
        let toggle = find(&doc, target, "tree-toggle").unwrap();
        assert_eq!(doc.text(toggle), "▾ ");
        doc.dispatch(toggle, &Event::Click);
        assert_eq!(expanded.borrow().as_slice(), ["p".to_string()]);
    }

    #[test]
    fn missing_cell_renders_empty() {
        let (r, _) = renderer();
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let root = doc.root();
        let target = doc.append_new(root, Tag::Cell, "");
        let column = Column::new("due", "Due", ColumnKind::Date);
        r.render(&mut doc, &mut registry, target, None, &column, &Row::new("a"), today());
        assert_eq!(doc.child_count(target), 0);
        assert_eq!(doc.attr(target, COLUMN_ATTR), Some("due"));
    }
}
