use std::collections::BTreeMap;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use super::{Event, EventKind, Handler, ListenerId, Surface, Tag};

new_key_type! {
    /// Generational node handle. A destroyed node's handle never aliases a
    /// newer node.
    pub struct NodeId;
}

/// Counters of structural mutations since creation (or the last reset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub created: usize,
    pub destroyed: usize,
    /// Insertions and appends of a node into a parent
    pub inserted: usize,
}

struct NodeData {
    tag: Tag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    listeners: Vec<(ListenerId, EventKind, Handler<Document>)>,
}

impl NodeData {
    fn new(tag: Tag) -> Self {
        NodeData {
            tag,
            parent: None,
            children: Vec::new(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            text: String::new(),
            value: if tag == Tag::Input { Some(String::new()) } else { None },
            listeners: Vec::new(),
        }
    }
}

/// In-memory retained node tree.
///
/// Events do not propagate: a dispatch runs only the target node's
/// listeners.
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    next_listener: u64,
    stats: MutationStats,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(Tag::Section));
        Document {
            nodes,
            root,
            next_listener: 0,
            stats: MutationStats::default(),
        }
    }

    pub fn stats(&self) -> MutationStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = MutationStats::default();
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.nodes.get(node).map_or(&[][..], |n| n.classes.as_slice())
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = None;
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == candidate {
                return true;
            }
            current = self.nodes.get(n).and_then(|d| d.parent);
        }
        false
    }
}

impl Surface for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn create(&mut self, tag: Tag) -> NodeId {
        self.stats.created += 1;
        self.nodes.insert(NodeData::new(tag))
    }

    fn destroy(&mut self, node: NodeId) {
        if node == self.root || !self.nodes.contains_key(node) {
            return;
        }
        self.unlink(node);
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(data) = self.nodes.remove(n) {
                self.stats.destroyed += 1;
                stack.extend(data.children);
            }
        }
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn tag(&self, node: NodeId) -> Option<Tag> {
        self.nodes.get(node).map(|n| n.tag)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.children.len())
    }

    fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.nodes.get(parent)?.children.get(index).copied()
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.nodes.get(parent)?.children.iter().position(|&c| c == node)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if reference == Some(child)
            || !self.nodes.contains_key(parent)
            || !self.nodes.contains_key(child)
            || self.is_ancestor_or_self(child, parent)
        {
            return;
        }
        self.unlink(child);
        let Some(p) = self.nodes.get_mut(parent) else {
            return;
        };
        let index = reference
            .and_then(|r| p.children.iter().position(|&c| c == r))
            .unwrap_or(p.children.len());
        p.children.insert(index, child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        self.stats.inserted += 1;
    }

    fn detach(&mut self, node: NodeId) {
        self.unlink(node);
    }

    fn clear(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.destroy(child);
        }
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node)?.attrs.get(name).map(String::as_str)
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attrs.remove(name);
        }
    }

    fn attr_names(&self, node: NodeId) -> Vec<String> {
        self.nodes
            .get(node)
            .map(|n| n.attrs.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn set_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.classes = class.split_whitespace().map(str::to_string).collect();
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            for c in class.split_whitespace() {
                if !n.classes.iter().any(|existing| existing == c) {
                    n.classes.push(c.to_string());
                }
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes.get(node)?.style.get(property).map(String::as_str)
    }

    fn clear_style(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.style.clear();
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.text = text.to_string();
        }
    }

    fn text(&self, node: NodeId) -> &str {
        self.nodes.get(node).map_or("", |n| n.text.as_str())
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.value = Some(value.to_string());
        }
    }

    fn value(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node)?.value.as_deref()
    }

    fn add_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: Handler<Self>,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        if let Some(n) = self.nodes.get_mut(node) {
            n.listeners.push((id, kind, handler));
        }
        id
    }

    fn remove_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(n) = self.nodes.get_mut(node) else {
            return false;
        };
        let before = n.listeners.len();
        n.listeners.retain(|(lid, _, _)| *lid != id);
        n.listeners.len() != before
    }

    fn listener_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.listeners.len())
    }

    fn dispatch(&mut self, node: NodeId, event: &Event) -> usize {
        let kind = event.kind();
        // Snapshot so handlers may add or remove listeners while running.
        let handlers: Vec<Handler<Self>> = match self.nodes.get(node) {
            Some(n) => n
                .listeners
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .map(|(_, _, h)| Rc::clone(h))
                .collect(),
            None => return 0,
        };
        for handler in &handlers {
            handler(self, event);
        }
        handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn insert_before_moves_existing_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create(Tag::Row);
        let b = doc.create(Tag::Row);
        let c = doc.create(Tag::Row);
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(root, c);

        doc.insert_before(root, c, Some(a));
        assert_eq!(doc.children(root), vec![c, a, b]);
        assert_eq!(doc.index_in_parent(b), Some(2));

        doc.insert_before(root, a, None);
        assert_eq!(doc.children(root), vec![c, b, a]);
        assert_eq!(doc.stats().inserted, 5);
    }

    #[test]
    fn destroy_frees_subtree_and_handles_stay_dead() {
        let mut doc = Document::new();
        let root = doc.root();
        let row = doc.append_new(root, Tag::Row, "r");
        let cell = doc.append_new(row, Tag::Cell, "c");
        doc.destroy(row);
        assert!(!doc.is_alive(row));
        assert!(!doc.is_alive(cell));
        assert_eq!(doc.child_count(root), 0);
        assert_eq!(doc.stats().destroyed, 2);

        let fresh = doc.create(Tag::Row);
        assert_ne!(fresh, row);
    }

    #[test]
    fn cannot_insert_ancestor_into_descendant() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_new(root, Tag::Section, "");
        let inner = doc.append_new(outer, Tag::Row, "");
        doc.append_child(inner, outer);
        assert_eq!(doc.parent(outer), Some(root));
        assert_eq!(doc.parent(inner), Some(outer));
    }

    #[test]
    fn dispatch_runs_matching_listeners_only() {
        let mut doc = Document::new();
        let node = doc.create(Tag::Button);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let handler: Handler<Document> =
            Rc::new(move |_: &mut Document, _: &Event| h.set(h.get() + 1));
        let id = doc.add_listener(node, EventKind::Click, handler);

        assert_eq!(doc.dispatch(node, &Event::Blur), 0);
        assert_eq!(doc.dispatch(node, &Event::Click), 1);
        assert_eq!(hits.get(), 1);

        assert!(doc.remove_listener(node, id));
        assert!(!doc.remove_listener(node, id));
        assert_eq!(doc.dispatch(node, &Event::Click), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn classes_are_deduplicated() {
        let mut doc = Document::new();
        let node = doc.create(Tag::Row);
        doc.set_class(node, "a b");
        doc.add_class(node, "b c");
        assert_eq!(doc.classes(node), ["a", "b", "c"]);
        doc.toggle_class(node, "a", false);
        assert!(!doc.has_class(node, "a"));
        doc.set_class(node, "");
        assert!(doc.classes(node).is_empty());
    }
}
