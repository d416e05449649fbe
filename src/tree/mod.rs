//! Arena-based document tree
//!
//! The rendered document is modeled as an arena of nodes addressed by
//! [`NodeId`]. Elements carry a tag and attributes; text leaves carry their
//! literal value. Cloning the arena preserves every `NodeId`, so a location
//! captured against one tree remains valid against its clone — this is the
//! property the structural path codec and the range replacer rely on.
//!
//! Detaching a node removes it from its parent but leaves the slot in the
//! arena; trees produced by replacement are throwaway working copies, so the
//! garbage is bounded by a single call.

use std::fmt;

mod text;

pub use text::{collect, collect_all, TextMap};

/// Identifier of a node within one [`DocTree`] arena (and its clones)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element tag and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    /// Attributes in document order
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }
}

/// What a node is: an element or a text leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// A single node: kind plus structural links
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element(_) => None,
        }
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }
}

/// The arena. One root element, any number of detached scratch nodes.
#[derive(Debug, Clone)]
pub struct DocTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl DocTree {
    /// Create a tree whose root is the given element.
    pub fn with_root(root: ElementData) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Element(root));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.alloc(NodeKind::Element(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(value.into()))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Position of `id` among its parent's children.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).element().map(|e| e.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).element().and_then(|e| e.attr(name))
    }

    /// Character length of a text node.
    pub fn text_len(&self, id: NodeId) -> Option<usize> {
        self.node(id).text().map(|t| t.chars().count())
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children. An attached
    /// child is detached from its old position first; an index past the end
    /// appends.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let index = index.min(self.children(parent).len());
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Remove `id` from its parent. The node (and its subtree) stays in the
    /// arena, merely unlinked.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(index) = self.child_index(id) {
            let parent = self.parent(id).unwrap();
            self.node_mut(parent).children.remove(index);
        }
        self.node_mut(id).parent = None;
    }

    /// True when `id` is `ancestor` or lies within its subtree.
    pub fn is_within(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Nearest node that is an ancestor-or-self of both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut cur = Some(a);
        while let Some(n) = cur {
            if self.is_within(n, b) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id`.
    pub fn subtree(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            for &child in self.children(next).iter().rev() {
                stack.push(child);
            }
            Some(next)
        })
    }

    /// Split the text node `id` at a character offset, producing two sibling
    /// text nodes: `id` keeps the text before the offset and the returned
    /// node carries the rest, inserted immediately after.
    ///
    /// Returns `None` when `id` is not a text node or the offset exceeds its
    /// length.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<(NodeId, NodeId)> {
        let text = self.node(id).text()?;
        let byte = char_to_byte(text, offset)?;
        let rest = text[byte..].to_string();
        if let NodeKind::Text(t) = &mut self.node_mut(id).kind {
            t.truncate(byte);
        }
        let right = self.create_text(rest);
        if let Some(parent) = self.parent(id) {
            let index = self.child_index(id).unwrap();
            self.insert(parent, index + 1, right);
        }
        Some((id, right))
    }
}

/// Byte index of the `offset`-th character, or `None` past the end.
fn char_to_byte(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (byte, _) in s.char_indices() {
        if seen == offset {
            return Some(byte);
        }
        seen += 1;
    }
    if seen == offset {
        Some(s.len())
    } else {
        None
    }
}
