//! Interactive board over a few hundred tasks.
//!
//! Run with `cargo run --example board [rows.json]`. Up/Down move the
//! selection, PageUp/PageDown jump a screen, Space advances the status of
//! the selected task and `q` quits. Debug logs go to `taskgrid-demo.log`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use chrono::{Days, Local};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use simplelog::{Config, LevelFilter, WriteLogger};
use taskgrid::io::rows_io::read_rows;
use taskgrid::model::{
    Cell, CellValue, Column, ColumnKind, Row, TableSettings, TaskStatus, shared_columns,
};
use taskgrid::surface::{Document, Event, Surface, descendants};
use taskgrid::table::{
    StatusMenuRequest, SuggestionError, SuggestionKind, TableCallbacks, TaskTable,
};
use taskgrid::tui::{TableView, Theme};

type Rows = Rc<RefCell<Vec<Row>>>;

fn main() -> io::Result<()> {
    // Set up file logging
    let log_file = File::create("taskgrid-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let rows: Rows = Rc::new(RefCell::new(match std::env::args().nth(1) {
        Some(path) => read_rows(Path::new(&path)).map_err(io::Error::other)?,
        None => generate_rows(300),
    }));
    let pending_menu: Rc<RefCell<Option<StatusMenuRequest>>> = Rc::default();

    let changes = Rc::clone(&rows);
    let menu = Rc::clone(&pending_menu);
    let callbacks = TableCallbacks::new()
        .on_cell_change(move |row_id, column_id, value| {
            log::info!("{row_id}.{column_id} <- {value:?}");
            let mut rows = changes.borrow_mut();
            let cell = rows
                .iter_mut()
                .find(|r| r.id == row_id)
                .and_then(|r| r.cells.iter_mut().find(|c| c.column_id == column_id));
            if let Some(cell) = cell {
                cell.value = value;
            }
        })
        .on_status_click(move |req| *menu.borrow_mut() = Some(req.clone()))
        .on_row_expand(|row_id| log::info!("expand {row_id}"));

    let mut table = TaskTable::new(
        Document::new(),
        shared_columns(columns()),
        &TableSettings::default(),
        callbacks,
    );
    table.set_suggestion_source(|kind: SuggestionKind| -> Result<Vec<String>, SuggestionError> {
        let words: &[&str] = match kind {
            SuggestionKind::Tags => &["bug", "design", "ready", "research"],
            SuggestionKind::Projects => &["core", "docs"],
            SuggestionKind::Contexts => &[],
        };
        Ok(words.iter().map(|w| w.to_string()).collect())
    });
    table.attach();
    log::debug!("tag suggestions: {:?}", table.suggestions(SuggestionKind::Tags));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut table, &rows, &pending_menu);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    table.detach();
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    table: &mut TaskTable<Document>,
    rows: &Rows,
    pending_menu: &Rc<RefCell<Option<StatusMenuRequest>>>,
) -> io::Result<()> {
    let theme = Theme::default();
    let mut offset = 0usize;
    let mut cursor = 0usize;

    loop {
        // one line for the header
        let visible = usize::from(terminal.size()?.height.saturating_sub(1)).max(1);
        let total = rows.borrow().len();
        cursor = cursor.min(total.saturating_sub(1));
        if cursor < offset {
            offset = cursor;
        } else if cursor >= offset + visible {
            offset = cursor + 1 - visible;
        }

        let window: Vec<Row> = rows
            .borrow()
            .iter()
            .skip(offset)
            .take(visible)
            .cloned()
            .collect();
        let selected: HashSet<String> = rows
            .borrow()
            .get(cursor)
            .map(|r| r.id.clone())
            .into_iter()
            .collect();
        let report = table.render_rows(&window, &selected, offset as i64);
        log::trace!("{report:?}");

        let Some(node) = table.table_node() else {
            return Ok(());
        };
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(TableView::new(table.surface(), node, &theme), area);
        })?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let CtEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Up => cursor = cursor.saturating_sub(1),
            KeyCode::Down => cursor += 1,
            KeyCode::PageUp => cursor = cursor.saturating_sub(visible),
            KeyCode::PageDown => cursor += visible,
            KeyCode::Char(' ') => advance_status(table, rows, cursor, pending_menu),
            _ => {}
        }
    }
}

/// Click the status badge of the row under the cursor and answer the menu
/// request with the next status.
fn advance_status(
    table: &mut TaskTable<Document>,
    rows: &Rows,
    cursor: usize,
    pending_menu: &Rc<RefCell<Option<StatusMenuRequest>>>,
) {
    let Some(id) = rows.borrow().get(cursor).map(|r| r.id.clone()) else {
        return;
    };
    let Some(row) = table.row_node(&id) else {
        return;
    };
    let badge = descendants(table.surface(), row)
        .into_iter()
        .find(|&n| table.surface().has_class(n, "status-badge"));
    if let Some(badge) = badge {
        table.dispatch(badge, &Event::Click);
    }

    let Some(req) = pending_menu.borrow_mut().take() else {
        return;
    };
    let next = TaskStatus::ALL
        .iter()
        .position(|&s| s == req.current)
        .map_or(TaskStatus::NotStarted, |i| TaskStatus::ALL[(i + 1) % TaskStatus::ALL.len()]);
    table.select_status(&req.row_id, &req.column_id, next);
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("status", "Status", ColumnKind::Status).width(14),
        Column::new("description", "Task", ColumnKind::Text)
            .width(36)
            .min_width(10)
            .resizable(),
        Column::new("priority", "Pri", ColumnKind::Priority).width(8),
        Column::new("due", "Due", ColumnKind::Date).width(20),
        Column::new("project", "Project", ColumnKind::Text).width(10),
        Column::new("tags", "Tags", ColumnKind::Tags).width(24),
    ]
}

fn generate_rows(count: usize) -> Vec<Row> {
    const TAGS: [&str; 4] = ["bug", "design", "ready", "research"];
    let today = Local::now().date_naive();
    (0..count)
        .map(|i| {
            let status = TaskStatus::ALL[i % TaskStatus::ALL.len()];
            let symbol = status.symbol().to_string();
            let tag = TAGS[i % TAGS.len()].to_string();
            let due = if i % 3 == 0 {
                None
            } else {
                today.checked_add_days(Days::new((i % 9) as u64)).map(|d| d - Days::new(2))
            };
            let project = if i % 4 == 0 {
                Cell::new("project", CellValue::Text("core".into()))
            } else {
                Cell::new("project", CellValue::Text(String::new())).inherited("docs", "notes/")
            };
            let mut row = Row::new(format!("task-{i}"))
                .level(usize::from(i % 5 != 0))
                .cell(Cell::new("status", CellValue::Status(symbol)).editable())
                .cell(
                    Cell::new("description", CellValue::Text(format!("**Task** number {i}")))
                        .editable(),
                )
                .cell(Cell::new("priority", CellValue::Priority(Some((i % 5) as u8))))
                .cell(Cell::new("due", CellValue::Date(due)).editable())
                .cell(project)
                .cell(Cell::new("tags", CellValue::Tags(vec![tag])).editable());
            if i % 5 == 0 {
                row = row.children(true);
            }
            row
        })
        .collect()
}
