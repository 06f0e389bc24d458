use std::collections::HashMap;
use std::rc::Rc;

use crate::surface::{Event, EventKind, ListenerId, Surface, Tag, descendants};

/// Marks non-input nodes that carry listeners so recycling can find them.
pub const INTERACTIVE_ATTR: &str = "data-interactive";

/// Records every listener this crate attaches, keyed by node, so a node
/// can be made listener-free in one call before it is recycled.
pub struct ListenerRegistry<S: Surface> {
    bindings: HashMap<S::Node, Vec<ListenerId>>,
}

impl<S: Surface> Default for ListenerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> ListenerRegistry<S> {
    pub fn new() -> Self {
        ListenerRegistry {
            bindings: HashMap::new(),
        }
    }

    /// Register `handler` on `node` and remember the binding.
    pub fn attach<F>(
        &mut self,
        surface: &mut S,
        node: S::Node,
        kind: EventKind,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&mut S, &Event) + 'static,
    {
        if !matches!(surface.tag(node), Some(Tag::Input | Tag::Button)) {
            surface.set_attr(node, INTERACTIVE_ATTR, "true");
        }
        let id = surface.add_listener(node, kind, Rc::new(handler));
        self.bindings.entry(node).or_default().push(id);
        id
    }

    /// Detach every recorded listener on `node` and on its interactive
    /// descendants. Returns the number of listeners removed.
    pub fn detach_all(&mut self, surface: &mut S, node: S::Node) -> usize {
        let mut removed = self.detach_node(surface, node);
        for child in descendants(surface, node) {
            if is_interactive(surface, child) {
                removed += self.detach_node(surface, child);
            }
        }
        removed
    }

    /// Detach one binding, leaving the node's other listeners in place.
    pub fn detach(&mut self, surface: &mut S, node: S::Node, id: ListenerId) -> bool {
        let Some(ids) = self.bindings.get_mut(&node) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|bound| *bound != id);
        let found = ids.len() != before;
        if ids.is_empty() {
            self.bindings.remove(&node);
        }
        if found {
            surface.remove_listener(node, id);
        }
        found
    }

    /// Detach everything this registry knows about.
    pub fn clear(&mut self, surface: &mut S) -> usize {
        let nodes: Vec<S::Node> = self.bindings.keys().copied().collect();
        nodes
            .into_iter()
            .map(|node| self.detach_node(surface, node))
            .sum()
    }

    /// Listeners currently recorded for `node` alone.
    pub fn bound_count(&self, node: S::Node) -> usize {
        self.bindings.get(&node).map_or(0, Vec::len)
    }

    /// Total listeners recorded across all nodes.
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn detach_node(&mut self, surface: &mut S, node: S::Node) -> usize {
        let Some(ids) = self.bindings.remove(&node) else {
            return 0;
        };
        for id in &ids {
            surface.remove_listener(node, *id);
        }
        ids.len()
    }
}

fn is_interactive<S: Surface>(surface: &S, node: S::Node) -> bool {
    matches!(surface.tag(node), Some(Tag::Input | Tag::Button))
        || surface.attr(node, INTERACTIVE_ATTR).is_some()
}
