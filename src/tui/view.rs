use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use super::theme::Theme;
use crate::model::TaskStatus;
use crate::surface::{Document, NodeId, Surface, Tag, descendants, text_content};
use crate::table::cells::EMPTY_PLACEHOLDER;
use crate::table::header::HEAD_CLASS;
use crate::table::reconcile::{BODY_CLASS, PLACEHOLDER_CLASS, SELECTED_CLASS};
use crate::table::virtual_scroll::SPACER_CLASS;
use crate::util::unicode::{display_width, fit_to_width, truncate_to_width};

/// Width used when a cell carries no width style
const FALLBACK_WIDTH: usize = 16;
const COLUMN_GAP: usize = 1;

/// Paints a table rendered into a [`Document`] onto a terminal buffer:
/// the header line, then one line per body row. The spacer row is not
/// painted; the host passes an already windowed row list.
pub struct TableView<'a> {
    doc: &'a Document,
    table: NodeId,
    theme: &'a Theme,
}

impl<'a> TableView<'a> {
    pub fn new(doc: &'a Document, table: NodeId, theme: &'a Theme) -> Self {
        TableView { doc, table, theme }
    }

    fn section(&self, class: &str) -> Option<NodeId> {
        self.doc
            .children(self.table)
            .into_iter()
            .find(|&c| self.doc.has_class(c, class))
    }

    fn header_line(&self, head: NodeId) -> Line<'static> {
        let style = Style::default()
            .fg(self.theme.text_bright)
            .bg(self.theme.header_bg)
            .add_modifier(Modifier::BOLD);
        let mut spans = Vec::new();
        for (i, th) in descendants(self.doc, head)
            .into_iter()
            .filter(|&n| self.doc.tag(n) == Some(Tag::HeaderCell))
            .enumerate()
        {
            if i > 0 {
                spans.push(Span::styled(" ".repeat(COLUMN_GAP), style));
            }
            let text = text_content(self.doc, th);
            spans.push(Span::styled(fit_to_width(&text, cell_width(self.doc, th), false), style));
        }
        Line::from(spans).style(style)
    }

    fn row_line(&self, row: NodeId) -> Line<'static> {
        let mut base = Style::default().fg(self.theme.text).bg(self.theme.background);
        if self.doc.has_class(row, SELECTED_CLASS) {
            base = base.bg(self.theme.selection_bg);
        }

        let mut spans = Vec::new();
        for (i, cell) in self.doc.children(row).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ".repeat(COLUMN_GAP), base));
            }
            spans.extend(self.cell_spans(cell, base));
        }
        Line::from(spans).style(base)
    }

    fn placeholder_line(&self, placeholder: NodeId, width: u16) -> Line<'static> {
        let style = Style::default().fg(self.theme.dim).bg(self.theme.background);
        let text = text_content(self.doc, placeholder);
        Line::from(Span::styled(truncate_to_width(&text, usize::from(width)), style))
    }

    /// Styled pieces of one cell, truncated or padded to the cell width.
    fn cell_spans(&self, cell: NodeId, base: Style) -> Vec<Span<'static>> {
        let width = cell_width(self.doc, cell);
        let right = self.doc.has_class(cell, "align-right");

        let mut pieces: Vec<(String, Style)> = Vec::new();
        for node in std::iter::once(cell).chain(descendants(self.doc, cell)) {
            let text = if self.doc.tag(node) == Some(Tag::Input) {
                self.doc.value(node).unwrap_or("")
            } else {
                self.doc.text(node)
            };
            if text.is_empty() {
                continue;
            }
            let text = text.replace(EMPTY_PLACEHOLDER, " ");
            let style = self.node_style(cell, node, base);
            if self.doc.has_class(node, "tags-text") {
                for (i, tag) in text.split(", ").enumerate() {
                    if i > 0 {
                        pieces.push((", ".into(), style));
                    }
                    pieces.push((tag.to_string(), style.fg(self.theme.tag_color(tag))));
                }
            } else {
                pieces.push((text, style));
            }
        }

        let full: String = pieces.iter().map(|(t, _)| t.as_str()).collect();
        let used = display_width(&full);
        if used > width {
            let style = pieces.first().map_or(base, |(_, s)| *s);
            return vec![Span::styled(truncate_to_width(&full, width), style)];
        }

        let pad = Span::styled(" ".repeat(width - used), base);
        let mut spans: Vec<Span<'static>> = pieces
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect();
        if right {
            spans.insert(0, pad);
        } else {
            spans.push(pad);
        }
        spans
    }

    /// Style of `node` from its own classes and those of its ancestors
    /// up to (and including) `cell`.
    fn node_style(&self, cell: NodeId, node: NodeId, base: Style) -> Style {
        let mut style = base;
        let mut chain = vec![node];
        let mut current = node;
        while current != cell {
            match self.doc.parent(current) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        for n in chain.into_iter().rev() {
            for class in self.doc.classes(n) {
                if let Some(color) = self.class_color(class) {
                    style = style.fg(color);
                }
            }
            if self.doc.tag(n) == Some(Tag::Input) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        style
    }

    fn class_color(&self, class: &str) -> Option<Color> {
        if let Some(status) = TaskStatus::ALL.into_iter().find(|s| s.class_name() == class) {
            return Some(self.theme.status_color(status));
        }
        let color = match class {
            "badge-overdue" | "badge-yesterday" => self.theme.red,
            "badge-today" | "tree-toggle" => self.theme.highlight,
            "badge-tomorrow" | "priority-high" => self.theme.yellow,
            "badge-upcoming" | "inherited-indicator" | "priority-none" => self.theme.dim,
            "priority-highest" => self.theme.red,
            _ => return None,
        };
        Some(color)
    }
}

impl Widget for TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.background));

        let mut y = area.y;
        if let Some(head) = self.section(HEAD_CLASS) {
            let line_area = Rect::new(area.x, y, area.width, 1);
            self.header_line(head).render(line_area, buf);
            y += 1;
        }

        let Some(body) = self.section(BODY_CLASS) else {
            return;
        };
        for row in self.doc.children(body) {
            if y >= area.bottom() {
                break;
            }
            if self.doc.has_class(row, SPACER_CLASS) {
                continue;
            }
            let line_area = Rect::new(area.x, y, area.width, 1);
            let line = if self.doc.has_class(row, PLACEHOLDER_CLASS) {
                self.placeholder_line(row, area.width)
            } else {
                self.row_line(row)
            };
            line.render(line_area, buf);
            y += 1;
        }
    }
}

fn cell_width(doc: &Document, cell: NodeId) -> usize {
    doc.style(cell, "width")
        .and_then(|w| w.parse::<usize>().ok())
        .unwrap_or(FALLBACK_WIDTH)
}
