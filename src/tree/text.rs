//! Text flattening
//!
//! [`collect`] is the basis of every textual comparison in the crate: the
//! flattened value of a subtree, in document order, with no separators and
//! no whitespace normalization. [`TextMap`] extends it with the absolute
//! character interval each node occupies in the flattened document text,
//! which is what range extraction and context windows are computed from.

use std::collections::HashMap;

use super::{DocTree, NodeId, NodeKind};

/// Flatten a subtree into its plain text.
pub fn collect(tree: &DocTree, id: NodeId) -> String {
    let mut out = String::new();
    collect_into(tree, id, &mut out);
    out
}

/// Flatten several subtrees, concatenated without separators.
pub fn collect_all(tree: &DocTree, ids: &[NodeId]) -> String {
    let mut out = String::new();
    for &id in ids {
        collect_into(tree, id, &mut out);
    }
    out
}

fn collect_into(tree: &DocTree, id: NodeId, out: &mut String) {
    match tree.node(id).kind() {
        NodeKind::Text(t) => out.push_str(t),
        NodeKind::Element(_) => {
            for &child in tree.node(id).children() {
                collect_into(tree, child, out);
            }
        }
    }
}

/// Flattened text of a root plus, per node, the character interval
/// `[start, end)` that node's text occupies within it.
///
/// Built in one pre-order pass. Intervals of elements cover their whole
/// subtree; an element without text content gets an empty interval at the
/// position its text would occupy.
#[derive(Debug)]
pub struct TextMap {
    text: String,
    char_len: usize,
    intervals: HashMap<NodeId, (usize, usize)>,
}

impl TextMap {
    pub fn build(tree: &DocTree, root: NodeId) -> Self {
        let mut map = Self {
            text: String::new(),
            char_len: 0,
            intervals: HashMap::new(),
        };
        map.visit(tree, root);
        map
    }

    fn visit(&mut self, tree: &DocTree, id: NodeId) {
        let start = self.char_len;
        match tree.node(id).kind() {
            NodeKind::Text(t) => {
                self.text.push_str(t);
                self.char_len += t.chars().count();
            }
            NodeKind::Element(_) => {
                for &child in tree.node(id).children() {
                    self.visit(tree, child);
                }
            }
        }
        self.intervals.insert(id, (start, self.char_len));
    }

    /// The flattened document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total length in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Character interval of a node's text within the document text.
    pub fn interval(&self, id: NodeId) -> Option<(usize, usize)> {
        self.intervals.get(&id).copied()
    }

    /// Absolute character position of a boundary given as node + offset.
    ///
    /// For a text node the offset counts characters into its value. For an
    /// element the offset is a child index: the boundary sits before that
    /// child's text (or at the element's text end when the offset equals the
    /// child count).
    pub fn position(&self, tree: &DocTree, node: NodeId, offset: usize) -> Option<usize> {
        let (start, end) = self.interval(node)?;
        match tree.node(node).kind() {
            NodeKind::Text(_) => {
                if start + offset <= end {
                    Some(start + offset)
                } else {
                    None
                }
            }
            NodeKind::Element(_) => {
                let children = tree.node(node).children();
                if offset < children.len() {
                    self.interval(children[offset]).map(|(s, _)| s)
                } else if offset == children.len() {
                    Some(end)
                } else {
                    None
                }
            }
        }
    }

    /// Slice the document text by character positions.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementData;

    /// <body><p>alpha <em>beta</em> gamma</p></body>
    fn sample() -> (DocTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DocTree::with_root(ElementData::new("body"));
        let p = tree.create_element(ElementData::new("p"));
        let t1 = tree.create_text("alpha ");
        let em = tree.create_element(ElementData::new("em"));
        let t2 = tree.create_text("beta");
        let t3 = tree.create_text(" gamma");
        tree.append(tree.root(), p);
        tree.append(p, t1);
        tree.append(p, em);
        tree.append(em, t2);
        tree.append(p, t3);
        (tree, p, t1, em, t2, t3)
    }

    #[test]
    fn test_collect_text_leaf() {
        let (tree, _, t1, ..) = sample();
        assert_eq!(collect(&tree, t1), "alpha ");
    }

    #[test]
    fn test_collect_container() {
        let (tree, p, ..) = sample();
        assert_eq!(collect(&tree, p), "alpha beta gamma");
        assert_eq!(collect(&tree, tree.root()), "alpha beta gamma");
    }

    #[test]
    fn test_collect_all_no_separators() {
        let (tree, _, t1, em, ..) = sample();
        assert_eq!(collect_all(&tree, &[t1, em]), "alpha beta");
        assert_eq!(collect_all(&tree, &[]), "");
    }

    #[test]
    fn test_collect_preserves_whitespace() {
        let mut tree = DocTree::with_root(ElementData::new("p"));
        let t = tree.create_text("  two\n  lines  ");
        tree.append(tree.root(), t);
        assert_eq!(collect(&tree, tree.root()), "  two\n  lines  ");
    }

    #[test]
    fn test_map_intervals() {
        let (tree, p, t1, em, t2, t3) = sample();
        let map = TextMap::build(&tree, tree.root());
        assert_eq!(map.text(), "alpha beta gamma");
        assert_eq!(map.interval(t1), Some((0, 6)));
        assert_eq!(map.interval(em), Some((6, 10)));
        assert_eq!(map.interval(t2), Some((6, 10)));
        assert_eq!(map.interval(t3), Some((10, 16)));
        assert_eq!(map.interval(p), Some((0, 16)));
    }

    #[test]
    fn test_map_positions() {
        let (tree, p, t1, _, t2, _) = sample();
        let map = TextMap::build(&tree, tree.root());
        assert_eq!(map.position(&tree, t1, 2), Some(2));
        assert_eq!(map.position(&tree, t2, 4), Some(10));
        assert_eq!(map.position(&tree, t2, 5), None);
        // element boundaries: before child 1 (the <em>), after last child
        assert_eq!(map.position(&tree, p, 1), Some(6));
        assert_eq!(map.position(&tree, p, 3), Some(16));
        assert_eq!(map.position(&tree, p, 4), None);
    }

    #[test]
    fn test_slice_is_char_based() {
        let mut tree = DocTree::with_root(ElementData::new("p"));
        let t = tree.create_text("héllo wörld");
        tree.append(tree.root(), t);
        let map = TextMap::build(&tree, tree.root());
        assert_eq!(map.slice(1, 5), "éllo");
        assert_eq!(map.slice(6, 11), "wörld");
    }
}
