//! Host node tree.
//!
//! A minimal retained tree the attachment can be declared on. Nodes are
//! shared (`Rc<RefCell<_>>`) so the view can keep mounting children after
//! the attachment was created, which is what makes the lookup retry
//! meaningful.

use super::text_area::TextAreaHandle;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared reference to a host node.
pub type HostRef = Rc<RefCell<HostNode>>;

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A text area leaf.
    TextArea(TextAreaHandle),
    /// A generic container, identified by tag for debugging.
    Element(String),
}

/// A node with light children and optional encapsulated (shadow) content.
#[derive(Debug, Clone)]
pub struct HostNode {
    kind: NodeKind,
    children: Vec<HostRef>,
    shadow_root: Option<Vec<HostRef>>,
}

impl HostNode {
    /// Create a container node.
    pub fn element(tag: impl Into<String>) -> HostRef {
        Rc::new(RefCell::new(Self {
            kind: NodeKind::Element(tag.into()),
            children: Vec::new(),
            shadow_root: None,
        }))
    }

    /// Create a text area node.
    pub fn text_area(handle: TextAreaHandle) -> HostRef {
        Rc::new(RefCell::new(Self {
            kind: NodeKind::TextArea(handle),
            children: Vec::new(),
            shadow_root: None,
        }))
    }

    /// Append a light child.
    pub fn append_child(parent: &HostRef, child: HostRef) {
        parent.borrow_mut().children.push(child);
    }

    /// Append a node to the shadow content, creating it if needed.
    pub fn append_shadow_child(host: &HostRef, child: HostRef) {
        host.borrow_mut()
            .shadow_root
            .get_or_insert_with(Vec::new)
            .push(child);
    }

    /// Remove all light children.
    pub fn clear_children(parent: &HostRef) {
        parent.borrow_mut().children.clear();
    }

    /// Node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The text area, if this node is one.
    pub fn as_text_area(&self) -> Option<&TextAreaHandle> {
        match &self.kind {
            NodeKind::TextArea(handle) => Some(handle),
            NodeKind::Element(_) => None,
        }
    }

    /// Light children.
    pub fn children(&self) -> &[HostRef] {
        &self.children
    }

    /// Shadow content, if attached.
    pub fn shadow_root(&self) -> Option<&[HostRef]> {
        self.shadow_root.as_deref()
    }

    /// First text area among the light descendants, in document order.
    ///
    /// Does not descend into shadow content of nested nodes.
    pub fn query_text_area(&self) -> Option<TextAreaHandle> {
        query_light(&self.children)
    }

    /// First text area in this node's shadow content, in document order.
    pub fn query_shadow_text_area(&self) -> Option<TextAreaHandle> {
        self.shadow_root.as_deref().and_then(query_light)
    }
}

fn query_light(nodes: &[HostRef]) -> Option<TextAreaHandle> {
    nodes.iter().find_map(|node| {
        let node = node.borrow();
        node.as_text_area()
            .cloned()
            .or_else(|| query_light(&node.children))
    })
}
