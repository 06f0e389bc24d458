use super::lifecycle::Lifecycle;
use super::listeners::ListenerRegistry;
use crate::surface::{Surface, Tag};

pub const SPACER_CLASS: &str = "virtual-spacer";

/// Maintains the single leading spacer row standing in for the rows
/// scrolled out above the rendered window.
pub struct VirtualScroll<S: Surface> {
    body: Option<S::Node>,
    row_height: u16,
}

impl<S: Surface> VirtualScroll<S> {
    pub fn new(row_height: u16) -> Self {
        VirtualScroll {
            body: None,
            row_height,
        }
    }

    pub fn row_height(&self) -> u16 {
        self.row_height
    }

    /// Replace any spacer with one sized for `start_index` hidden rows.
    /// `start_index <= 0` leaves no spacer.
    pub fn update(&mut self, surface: &mut S, start_index: i64, column_count: usize) {
        let Some(body) = self.body else {
            return;
        };
        self.remove_spacers(surface, body);
        if start_index <= 0 {
            return;
        }

        let height = start_index.saturating_mul(i64::from(self.row_height));
        let spacer = surface.create(Tag::Row);
        surface.set_class(spacer, SPACER_CLASS);
        surface.set_style(spacer, "height", &format!("{height}px"));
        let cell = surface.append_new(spacer, Tag::Cell, "");
        surface.set_attr(cell, "colspan", &column_count.max(1).to_string());
        let first = surface.child_at(body, 0);
        surface.insert_before(body, spacer, first);
    }

    /// Whether the body currently starts with a spacer.
    pub fn has_spacer(&self, surface: &S) -> bool {
        self.body
            .and_then(|body| surface.child_at(body, 0))
            .is_some_and(|first| surface.has_class(first, SPACER_CLASS))
    }

    fn remove_spacers(&self, surface: &mut S, body: S::Node) {
        for child in surface.children(body) {
            if surface.has_class(child, SPACER_CLASS) {
                surface.destroy(child);
            }
        }
    }
}

impl<S: Surface> Lifecycle<S> for VirtualScroll<S> {
    fn attach(&mut self, _surface: &mut S, _listeners: &mut ListenerRegistry<S>, parent: S::Node) {
        self.body = Some(parent);
    }

    fn detach(&mut self, surface: &mut S, _listeners: &mut ListenerRegistry<S>) {
        if let Some(body) = self.body.take() {
            self.remove_spacers(surface, body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Document;

    fn attached() -> (Document, ListenerRegistry<Document>, VirtualScroll<Document>) {
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let mut scroll = VirtualScroll::new(32);
        let root = doc.root();
        scroll.attach(&mut doc, &mut registry, root);
        (doc, registry, scroll)
    }

    #[test]
    fn zero_or_negative_means_no_spacer() {
        let (mut doc, _registry, mut scroll) = attached();
        scroll.update(&mut doc, 0, 3);
        assert!(!scroll.has_spacer(&doc));
        scroll.update(&mut doc, -4, 3);
        assert_eq!(doc.child_count(doc.root()), 0);
    }

    #[test]
    fn single_spacer_sized_by_offset() {
        let (mut doc, _registry, mut scroll) = attached();
        let root = doc.root();
        let row = doc.append_new(root, Tag::Row, "task-row");

        scroll.update(&mut doc, 5, 3);
        scroll.update(&mut doc, 7, 3);

        let spacers: Vec<_> = doc
            .children(root)
            .into_iter()
            .filter(|&c| doc.has_class(c, SPACER_CLASS))
            .collect();
        assert_eq!(spacers.len(), 1);
        assert_eq!(doc.child_at(root, 0), Some(spacers[0]));
        assert_eq!(doc.child_at(root, 1), Some(row));
        assert_eq!(doc.style(spacers[0], "height"), Some("224px"));
        let cell = doc.child_at(spacers[0], 0).unwrap();
        assert_eq!(doc.attr(cell, "colspan"), Some("3"));
        assert_eq!(doc.listener_count(spacers[0]), 0);
    }

    #[test]
    fn detach_removes_spacer() {
        let (mut doc, mut registry, mut scroll) = attached();
        scroll.update(&mut doc, 2, 1);
        scroll.detach(&mut doc, &mut registry);
        assert_eq!(doc.child_count(doc.root()), 0);
        scroll.update(&mut doc, 2, 1);
        assert_eq!(doc.child_count(doc.root()), 0);
    }
}
