use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use taskgrid::model::{
    Cell, CellValue, Column, ColumnKind, Row, TableSettings, TaskStatus, shared_columns,
};
use taskgrid::surface::{
    Document, Event, EventKind, Key, NodeId, Surface, Tag, descendants, text_content,
};
use taskgrid::table::{ROW_EXPAND_EVENT, TableCallbacks, TaskTable};

type Log = Rc<RefCell<Vec<String>>>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn logging_callbacks(log: &Log) -> TableCallbacks {
    let (changes, dates, expands, resizes, menus) = (
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
        Rc::clone(log),
    );
    TableCallbacks::new()
        .on_cell_change(move |row, col, value| {
            changes
                .borrow_mut()
                .push(format!("change {row}.{col} {value:?}"))
        })
        .on_date_change(move |row, col, date| {
            dates.borrow_mut().push(format!("date {row}.{col} {date:?}"))
        })
        .on_row_expand(move |row| expands.borrow_mut().push(format!("expand {row}")))
        .on_column_resize(move |col, width| {
            resizes.borrow_mut().push(format!("resize {col} {width}"))
        })
        .on_status_click(move |req| {
            let line = format!("menu {} {:?}", req.row_id, req.current);
            menus.borrow_mut().push(line)
        })
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("status", "Status", ColumnKind::Status),
        Column::new("description", "Task", ColumnKind::Text)
            .width(30)
            .min_width(8)
            .resizable(),
        Column::new("due", "Due", ColumnKind::Date),
        Column::new("tags", "Tags", ColumnKind::Tags),
    ]
}

fn task(id: &str) -> Row {
    Row::new(id)
        .children(false)
        .cell(Cell::new("status", CellValue::Status("/".into())).editable())
        .cell(Cell::new("description", CellValue::Text(format!("Task {id}"))))
        .cell(Cell::new("due", CellValue::Date(today().succ_opt())))
        .cell(Cell::new("tags", CellValue::Tags(vec!["x".into(), "y".into()])).editable())
}

fn table_with(callbacks: TableCallbacks) -> TaskTable<Document> {
    let mut t = TaskTable::new(
        Document::new(),
        shared_columns(columns()),
        &TableSettings::default(),
        callbacks,
    );
    t.set_today(today());
    t.attach();
    t.render_rows(&[task("t1"), task("t2")], &HashSet::new(), 0);
    t
}

fn find_in(t: &TaskTable<Document>, node: NodeId, class: &str) -> NodeId {
    descendants(t.surface(), node)
        .into_iter()
        .find(|&n| t.surface().has_class(n, class))
        .unwrap_or_else(|| panic!("no .{class} under {node:?}"))
}

fn cell_of(t: &TaskTable<Document>, row: &str, index: usize) -> NodeId {
    let row = t.row_node(row).unwrap();
    t.surface().child_at(row, index).unwrap()
}

#[test]
fn tags_reordered_do_not_fire_but_removal_does() {
    let log = Log::default();
    let mut t = table_with(logging_callbacks(&log));
    let input = find_in(&t, cell_of(&t, "t1", 3), "tags-input");
    assert_eq!(t.surface().value(input), Some("x, y"));

    t.surface_mut().set_value(input, "y, x");
    t.dispatch(input, &Event::Blur);
    assert!(log.borrow().is_empty());

    t.surface_mut().set_value(input, "y");
    t.dispatch(input, &Event::Key(Key::Enter));
    assert_eq!(log.borrow().as_slice(), ["change t1.tags Tags([\"y\"])"]);
}

#[test]
fn tomorrow_badge() {
    let t = table_with(TableCallbacks::new());
    let due = cell_of(&t, "t2", 2);
    let badge = find_in(&t, due, "date-badge");
    assert_eq!(t.surface().text(badge).trim(), "Tomorrow");
    assert!(t.surface().has_class(badge, "badge-tomorrow"));
}

#[test]
fn status_menu_round_trip() {
    let log = Log::default();
    let mut t = table_with(logging_callbacks(&log));
    let badge = find_in(&t, cell_of(&t, "t2", 0), "status-badge");
    assert_eq!(t.surface().tag(badge), Some(Tag::Button));

    t.dispatch(badge, &Event::Click);
    t.select_status("t2", "status", TaskStatus::Completed);
    t.select_date("t2", "due", None);
    assert_eq!(
        log.borrow().as_slice(),
        [
            "menu t2 InProgress",
            "change t2.status Status(\"x\")",
            "date t2.due None",
        ]
    );
}

#[test]
fn expand_prefers_callback() {
    let log = Log::default();
    let mut t = table_with(logging_callbacks(&log));
    let toggle = find_in(&t, cell_of(&t, "t1", 1), "tree-toggle");
    assert_eq!(t.dispatch(toggle, &Event::Click), 1);
    assert_eq!(log.borrow().as_slice(), ["expand t1"]);
}

#[test]
fn expand_without_callback_notifies_surface_root() {
    let mut t = table_with(TableCallbacks::new());
    let seen: Log = Log::default();
    let sink = Rc::clone(&seen);
    let root = t.surface().root();
    t.surface_mut().add_listener(
        root,
        EventKind::Custom,
        Rc::new(move |_: &mut Document, event: &Event| {
            if let Event::Custom { name, detail } = event {
                sink.borrow_mut().push(format!("{name}:{detail}"));
            }
        }),
    );

    let toggle = find_in(&t, cell_of(&t, "t2", 1), "tree-toggle");
    t.dispatch(toggle, &Event::Click);
    assert_eq!(seen.borrow().as_slice(), [format!("{ROW_EXPAND_EVENT}:t2")]);
}

#[test]
fn column_resize_applies_live_and_persists() {
    let log = Log::default();
    let mut t = table_with(logging_callbacks(&log));
    let head = t.head_node().unwrap();
    let handle = find_in(&t, head, "resize-handle");
    let root = t.surface().root();

    t.dispatch(handle, &Event::PointerDown { x: 40 });
    t.dispatch(root, &Event::PointerMove { x: 45 });
    let body_cell = cell_of(&t, "t1", 1);
    assert_eq!(t.surface().style(body_cell, "width"), Some("35"));
    assert_eq!(t.surface().style(cell_of(&t, "t2", 1), "width"), Some("35"));
    assert_eq!(t.columns().borrow()[1].width, 30);

    t.dispatch(root, &Event::PointerUp { x: 10 });
    assert_eq!(t.columns().borrow()[1].width, 8);
    assert_eq!(log.borrow().as_slice(), ["resize description 8"]);

    // the next pass renders with the persisted width
    t.render_rows(&[task("t1")], &HashSet::new(), 0);
    assert_eq!(t.surface().style(cell_of(&t, "t1", 1), "width"), Some("8"));
}

#[test]
fn rerender_after_data_change_updates_text_only() {
    let mut t = table_with(TableCallbacks::new());
    let node = t.row_node("t1").unwrap();

    let mut renamed = task("t1");
    renamed.cells[1].value = CellValue::Text("**Renamed** [[Docs|docs]]".into());
    let report = t.render_rows(&[renamed, task("t2")], &HashSet::new(), 0);

    assert_eq!(report.repopulated, 1);
    assert_eq!(t.row_node("t1"), Some(node));
    assert_eq!(text_content(t.surface(), cell_of(&t, "t1", 1)), "▸ Renamed docs");
}

#[test]
fn rejected_edit_is_reset_by_identical_rerender() {
    let log = Log::default();
    let mut t = table_with(logging_callbacks(&log));
    let input = find_in(&t, cell_of(&t, "t1", 3), "tags-input");
    t.surface_mut().set_value(input, "z");
    t.dispatch(input, &Event::Blur);
    assert_eq!(log.borrow().as_slice(), ["change t1.tags Tags([\"z\"])"]);

    // the data layer keeps the old tags and renders the same rows again
    let report = t.render_rows(&[task("t1"), task("t2")], &HashSet::new(), 0);
    assert_eq!(report.repopulated, 1);
    let input = find_in(&t, cell_of(&t, "t1", 3), "tags-input");
    assert_eq!(t.surface().value(input), Some("x, y"));

    t.surface_mut().set_value(input, "y, x");
    t.dispatch(input, &Event::Blur);
    assert_eq!(log.borrow().len(), 1);
}
