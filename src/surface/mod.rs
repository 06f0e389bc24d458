//! Retained rendering surface abstraction.
//!
//! The reconciler and cell renderer only need identity-keyed node handles,
//! ordered child insertion, attribute tags, classes and listeners. [`Surface`]
//! captures exactly that, so the same engine drives any retained-mode tree.
//! [`Document`] is the in-process implementation used by terminal hosts and
//! tests.

mod document;
mod event;

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

pub use document::{Document, MutationStats, NodeId};
pub use event::{Event, EventKind, Key};

/// Listener callback. Receives the surface so it can read input values or
/// dispatch follow-up events.
pub type Handler<S> = Rc<dyn Fn(&mut S, &Event)>;

/// Identifies one registered listener on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Node element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Table,
    Section,
    Row,
    Cell,
    HeaderCell,
    Span,
    Input,
    Button,
}

/// Attribute prefix stripped from rows on release
pub const DATA_PREFIX: &str = "data-";

pub trait Surface: Sized + 'static {
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// The node hosting everything; receives fallback notifications.
    fn root(&self) -> Self::Node;

    // Lifetime
    fn create(&mut self, tag: Tag) -> Self::Node;
    /// Unlink and free the node and its whole subtree.
    fn destroy(&mut self, node: Self::Node);
    fn is_alive(&self, node: Self::Node) -> bool;
    fn tag(&self, node: Self::Node) -> Option<Tag>;

    // Tree
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
    fn child_count(&self, node: Self::Node) -> usize;
    fn child_at(&self, parent: Self::Node, index: usize) -> Option<Self::Node>;
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    /// Insert `child` before `reference`; `None` appends.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        child: Self::Node,
        reference: Option<Self::Node>,
    );
    /// Unlink from the parent without freeing.
    fn detach(&mut self, node: Self::Node);
    /// Destroy every child of the node.
    fn clear(&mut self, node: Self::Node);

    // Attributes
    fn set_attr(&mut self, node: Self::Node, name: &str, value: &str);
    fn attr(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn remove_attr(&mut self, node: Self::Node, name: &str);
    fn attr_names(&self, node: Self::Node) -> Vec<String>;

    // Classes
    /// Replace the whole class list. An empty string clears it.
    fn set_class(&mut self, node: Self::Node, class: &str);
    fn add_class(&mut self, node: Self::Node, class: &str);
    fn remove_class(&mut self, node: Self::Node, class: &str);
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    // Style and content
    fn set_style(&mut self, node: Self::Node, property: &str, value: &str);
    fn style(&self, node: Self::Node, property: &str) -> Option<&str>;
    fn clear_style(&mut self, node: Self::Node);
    fn set_text(&mut self, node: Self::Node, text: &str);
    fn text(&self, node: Self::Node) -> &str;
    fn set_value(&mut self, node: Self::Node, value: &str);
    fn value(&self, node: Self::Node) -> Option<&str>;

    // Listeners
    fn add_listener(
        &mut self,
        node: Self::Node,
        kind: EventKind,
        handler: Handler<Self>,
    ) -> ListenerId;
    fn remove_listener(&mut self, node: Self::Node, id: ListenerId) -> bool;
    fn listener_count(&self, node: Self::Node) -> usize;
    /// Run the node's listeners for this event. Returns how many fired.
    fn dispatch(&mut self, node: Self::Node, event: &Event) -> usize;

    fn toggle_class(&mut self, node: Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Position of the node among its parent's children.
    fn index_in_parent(&self, node: Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        (0..self.child_count(parent)).find(|&i| self.child_at(parent, i) == Some(node))
    }

    /// Append a new node with the given tag and class.
    fn append_new(&mut self, parent: Self::Node, tag: Tag, class: &str) -> Self::Node {
        let node = self.create(tag);
        if !class.is_empty() {
            self.set_class(node, class);
        }
        self.append_child(parent, node);
        node
    }
}

/// All descendants of `node` in document order (the node itself excluded).
pub fn descendants<S: Surface>(surface: &S, node: S::Node) -> Vec<S::Node> {
    let mut out = Vec::new();
    let mut stack: Vec<S::Node> = surface.children(node).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(surface.children(next).into_iter().rev());
    }
    out
}

/// Concatenated text of a node and its descendants; inputs contribute
/// their value.
pub fn text_content<S: Surface>(surface: &S, node: S::Node) -> String {
    let mut out = String::new();
    for n in std::iter::once(node).chain(descendants(surface, node)) {
        if surface.tag(n) == Some(Tag::Input) {
            out.push_str(surface.value(n).unwrap_or(""));
        } else {
            out.push_str(surface.text(n));
        }
    }
    out
}

/// First direct child of `parent` whose attribute `name` equals `value`.
pub fn find_child_by_attr<S: Surface>(
    surface: &S,
    parent: S::Node,
    name: &str,
    value: &str,
) -> Option<S::Node> {
    surface
        .children(parent)
        .into_iter()
        .find(|&c| surface.attr(c, name) == Some(value))
}
