use log::trace;

use super::listeners::ListenerRegistry;
use crate::surface::{DATA_PREFIX, Surface, Tag};

/// Default number of released rows kept for reuse
pub const DEFAULT_POOL_CAPACITY: usize = 50;

/// Bounded free-list of row containers.
///
/// Every pooled node is detached from the surface, listener-free, empty,
/// and carries no `data-*` attributes, class or style.
pub struct RowPool<S: Surface> {
    free: Vec<S::Node>,
    capacity: usize,
}

impl<S: Surface> RowPool<S> {
    pub fn new(capacity: usize) -> Self {
        RowPool {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, node: S::Node) -> bool {
        self.free.contains(&node)
    }

    /// A pooled row if one is free, otherwise a fresh one.
    pub fn acquire(&mut self, surface: &mut S) -> S::Node {
        while let Some(node) = self.free.pop() {
            if surface.is_alive(node) {
                return node;
            }
        }
        surface.create(Tag::Row)
    }

    /// Scrub `node` and keep it for reuse, or destroy it when the pool is
    /// full. Releasing an already pooled node does nothing.
    pub fn release(&mut self, surface: &mut S, registry: &mut ListenerRegistry<S>, node: S::Node) {
        if self.contains(node) || !surface.is_alive(node) {
            return;
        }
        registry.detach_all(surface, node);
        surface.clear(node);
        for name in surface.attr_names(node) {
            if name.starts_with(DATA_PREFIX) {
                surface.remove_attr(node, &name);
            }
        }
        surface.set_class(node, "");
        surface.clear_style(node);
        surface.set_text(node, "");
        surface.detach(node);

        if self.free.len() < self.capacity {
            self.free.push(node);
        } else {
            trace!("row pool full ({}), discarding node {:?}", self.capacity, node);
            surface.destroy(node);
        }
    }

    /// Destroy every pooled node.
    pub fn drain(&mut self, surface: &mut S) {
        for node in self.free.drain(..) {
            surface.destroy(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Document, Event, EventKind};

    fn dirty_row(
        doc: &mut Document,
        registry: &mut ListenerRegistry<Document>,
    ) -> crate::surface::NodeId {
        let root = doc.root();
        let row = doc.append_new(root, Tag::Row, "task-row is-selected");
        doc.set_attr(row, "data-row-id", "a");
        doc.set_attr(row, "data-level", "1");
        doc.set_attr(row, "title", "kept");
        doc.set_style(row, "height", "32px");
        let cell = doc.append_new(row, Tag::Cell, "");
        let input = doc.append_new(cell, Tag::Input, "");
        registry.attach(doc, input, EventKind::Blur, |_, _| {});
        registry.attach(doc, row, EventKind::Click, |_, _| {});
        row
    }

    #[test]
    fn release_scrubs_node() {
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let mut pool = RowPool::new(4);
        let row = dirty_row(&mut doc, &mut registry);

        pool.release(&mut doc, &mut registry, row);

        assert_eq!(pool.len(), 1);
        assert!(doc.is_alive(row));
        assert_eq!(doc.parent(row), None);
        assert_eq!(doc.child_count(row), 0);
        assert_eq!(doc.attr(row, "data-row-id"), None);
        assert_eq!(doc.attr(row, "data-level"), None);
        assert_eq!(doc.attr(row, "title"), Some("kept"));
        assert!(doc.classes(row).is_empty());
        assert_eq!(doc.style(row, "height"), None);
        assert_eq!(doc.dispatch(row, &Event::Click), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn release_twice_is_noop() {
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let mut pool = RowPool::new(4);
        let row = dirty_row(&mut doc, &mut registry);

        pool.release(&mut doc, &mut registry, row);
        pool.release(&mut doc, &mut registry, row);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pool_is_bounded() {
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let mut pool = RowPool::new(2);
        let rows: Vec<_> = (0..5).map(|_| dirty_row(&mut doc, &mut registry)).collect();

        for &row in &rows {
            pool.release(&mut doc, &mut registry, row);
        }
        assert_eq!(pool.len(), 2);
        assert!(doc.is_alive(rows[0]));
        assert!(doc.is_alive(rows[1]));
        assert!(!doc.is_alive(rows[4]));
    }

    #[test]
    fn acquire_reuses_then_allocates() {
        let mut doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let mut pool = RowPool::new(2);
        let row = dirty_row(&mut doc, &mut registry);
        pool.release(&mut doc, &mut registry, row);

        assert_eq!(pool.acquire(&mut doc), row);
        let fresh = pool.acquire(&mut doc);
        assert_ne!(fresh, row);
        assert_eq!(doc.tag(fresh), Some(Tag::Row));
    }
}
