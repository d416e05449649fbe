//! Range replacement
//!
//! Reconstructs a captured range inside a clone of the anchoring root,
//! splits the boundary text nodes, extracts everything the range spans and
//! substitutes the supplied markup. The live tree is never mutated; the
//! caller decides whether the returned clone becomes the new canonical tree.

use tracing::{debug, trace};

use crate::error::{AnchorError, Result};
use crate::markup;
use crate::path::{Location, NodePath, PathCodec};
use crate::selector::StoredSelector;
use crate::tree::{DocTree, NodeId, NodeKind};

use super::Range;

/// Replay a stored selector against a clone of `root` and replace the span
/// it designates with `replacement` markup, returning the mutated clone.
///
/// Paths that no longer resolve against the current tree shape fail with
/// [`AnchorError::StaleSelector`]; the caller must prompt re-selection
/// rather than retry. Both boundaries must land on or descend to a text
/// leaf; a boundary addressing an element with no text beneath it cannot
/// anchor a replacement.
pub fn replace(
    tree: &DocTree,
    root: NodeId,
    selector: &StoredSelector,
    replacement: &str,
    codec: &impl PathCodec,
) -> Result<DocTree> {
    let mut clone = tree.clone();

    let start = decode_boundary(&clone, root, &selector.start, selector.start_offset, codec)?;
    let end = decode_boundary(&clone, root, &selector.end, selector.end_offset, codec)?;
    debug!(start = %selector.start, end = %selector.end, "replaying stored selector");

    replace_span(&mut clone, root, start, end, replacement, BoundaryFault::Stale)?;
    Ok(clone)
}

/// Resolve one stored boundary. Some producers keep the offset only in the
/// separate wire field and serialize a path without an `:offset` suffix; in
/// that case the wire offset is attached to the path before decoding so the
/// codec still validates it. When both carry an offset they must agree.
fn decode_boundary(
    tree: &DocTree,
    root: NodeId,
    path: &NodePath,
    wire_offset: usize,
    codec: &impl PathCodec,
) -> Result<Location> {
    match path.offset() {
        Some(offset) if offset != wire_offset => Err(AnchorError::StaleSelector(format!(
            "path {path} disagrees with stored offset {wire_offset}"
        ))),
        Some(_) => codec
            .decode(tree, root, path)
            .map_err(|e| AnchorError::StaleSelector(format!("path {path}: {e}"))),
        None => {
            let with_offset = NodePath::with_offset(path.steps().to_vec(), wire_offset);
            codec
                .decode(tree, root, &with_offset)
                .map_err(|e| AnchorError::StaleSelector(format!("path {with_offset}: {e}")))
        }
    }
}

/// Replace a raw range (no stored paths involved) on a clone of the tree.
///
/// Node ids stay valid across cloning, so the caller's range addresses the
/// clone directly. Malformed boundaries fail with
/// [`AnchorError::InvalidRange`]: offsets past their node, reversed ends,
/// or a boundary addressing an element with no text leaf beneath it.
pub fn replace_range(
    tree: &DocTree,
    root: NodeId,
    range: &Range,
    replacement: &str,
) -> Result<DocTree> {
    if range.is_collapsed() {
        return Err(AnchorError::InvalidRange("range is collapsed".into()));
    }
    for node in [range.start_node, range.end_node] {
        if !tree.is_within(root, node) {
            return Err(AnchorError::InvalidRange(format!(
                "range boundary {node} lies outside the anchoring root"
            )));
        }
    }

    let mut clone = tree.clone();
    replace_span(
        &mut clone,
        root,
        Location::new(range.start_node, range.start_offset),
        Location::new(range.end_node, range.end_offset),
        replacement,
        BoundaryFault::Invalid,
    )?;
    Ok(clone)
}

/// Which error class a bad boundary maps to: a stored path that stopped
/// lining up with the tree is stale, a bad live range is caller error.
#[derive(Clone, Copy)]
enum BoundaryFault {
    Stale,
    Invalid,
}

impl BoundaryFault {
    fn err(self, reason: &str) -> AnchorError {
        match self {
            BoundaryFault::Stale => AnchorError::StaleSelector(reason.to_string()),
            BoundaryFault::Invalid => AnchorError::InvalidRange(reason.to_string()),
        }
    }
}

fn replace_span(
    tree: &mut DocTree,
    root: NodeId,
    start: Location,
    end: Location,
    replacement: &str,
    fault: BoundaryFault,
) -> Result<()> {
    // Element-container boundaries carry a child index, not a character
    // offset; descend until both boundaries sit in concrete text leaves.
    let start = descend_start(tree, start, fault)?;
    let end = descend_end(tree, end, fault)?;

    let (spanned, lca, insert_at) = if start.node == end.node {
        if start.offset > end.offset {
            return Err(AnchorError::InvalidRange(
                "range end precedes range start".into(),
            ));
        }
        split_same_node(tree, start.node, start.offset, end.offset, fault)?
    } else {
        if !precedes(tree, root, start.node, end.node) {
            return Err(AnchorError::InvalidRange(
                "range end precedes range start".into(),
            ));
        }
        split_spanning(tree, start, end, fault)?
    };

    trace!(count = spanned.len(), "extracting spanned nodes");
    for &node in &spanned {
        tree.detach(node);
    }

    let fragment = markup::parse_fragment(tree, replacement)?;
    for (i, &node) in fragment.iter().enumerate() {
        tree.insert(lca, insert_at + i, node);
    }
    Ok(())
}

/// Both split paths answer: the nodes the range spans (maximal subtrees),
/// the element they hang off, and the child index where the replacement
/// goes once they are detached.
type SplitOutcome = (Vec<NodeId>, NodeId, usize);

fn split_same_node(
    tree: &mut DocTree,
    node: NodeId,
    from: usize,
    to: usize,
    fault: BoundaryFault,
) -> Result<SplitOutcome> {
    let len = tree
        .text_len(node)
        .ok_or_else(|| fault.err("range boundary is not a text node"))?;
    if to > len {
        return Err(fault.err("offset runs past the text node"));
    }

    // Split off the tail first so the head split cannot shift it.
    if to < len {
        tree.split_text(node, to)
            .ok_or_else(|| fault.err("end offset does not split"))?;
    }
    let inside = if from > 0 {
        let (_, right) = tree
            .split_text(node, from)
            .ok_or_else(|| fault.err("start offset does not split"))?;
        right
    } else {
        node
    };

    let parent = tree
        .parent(inside)
        .ok_or_else(|| fault.err("spanned text has no parent"))?;
    let index = tree.child_index(inside).unwrap();
    Ok((vec![inside], parent, index))
}

fn split_spanning(
    tree: &mut DocTree,
    start: Location,
    end: Location,
    fault: BoundaryFault,
) -> Result<SplitOutcome> {
    // Start boundary: the piece from the offset onward is inside the range.
    let start_inside = if start.offset > 0 {
        let (_, right) = tree
            .split_text(start.node, start.offset)
            .ok_or_else(|| fault.err("start offset does not split"))?;
        right
    } else {
        start.node
    };

    // End boundary: the piece before the offset is inside the range.
    let end_len = tree
        .text_len(end.node)
        .ok_or_else(|| fault.err("range boundary is not a text node"))?;
    let end_inside = if end.offset < end_len {
        let (left, _) = tree
            .split_text(end.node, end.offset)
            .ok_or_else(|| fault.err("end offset does not split"))?;
        left
    } else {
        end.node
    };

    let lca = tree
        .common_ancestor(start_inside, end_inside)
        .ok_or_else(|| fault.err("range boundaries share no ancestor"))?;

    // Climb from each boundary to the level just below the common ancestor,
    // sweeping in the whole siblings the range covers on the way up.
    let mut spanned = vec![start_inside];
    let mut node = start_inside;
    while tree.parent(node) != Some(lca) {
        let parent = tree
            .parent(node)
            .ok_or_else(|| fault.err("range boundary detached from the root"))?;
        let index = tree.child_index(node).unwrap();
        spanned.extend_from_slice(&tree.children(parent)[index + 1..]);
        node = parent;
    }
    let start_top = node;

    spanned.push(end_inside);
    let mut node = end_inside;
    while tree.parent(node) != Some(lca) {
        let parent = tree
            .parent(node)
            .ok_or_else(|| fault.err("range boundary detached from the root"))?;
        let index = tree.child_index(node).unwrap();
        spanned.extend_from_slice(&tree.children(parent)[..index]);
        node = parent;
    }
    let end_top = node;

    let start_index = tree.child_index(start_top).unwrap_or(0);
    let end_index = tree.child_index(end_top).unwrap_or(0);
    if start_index > end_index {
        return Err(AnchorError::InvalidRange(
            "range end precedes range start".into(),
        ));
    }
    // Whole siblings strictly between the two boundary chains.
    spanned.extend_from_slice(&tree.children(lca)[start_index + 1..end_index]);

    // When the start chain is deeper than one level, its partially-spanned
    // ancestor stays behind as a shell holding the before-range content; the
    // replacement then goes after that shell.
    let insert_at = if start_top == start_inside {
        start_index
    } else {
        start_index + 1
    };

    Ok((spanned, lca, insert_at))
}

/// Resolve an element-container boundary down to a concrete text leaf.
/// For the start of a range the boundary maps to the first text position at
/// or after the indexed child.
fn descend_start(tree: &DocTree, loc: Location, fault: BoundaryFault) -> Result<Location> {
    let mut node = loc.node;
    let mut offset = loc.offset;
    loop {
        match tree.node(node).kind() {
            NodeKind::Text(_) => {
                let len = tree.text_len(node).unwrap_or(0);
                if offset > len {
                    return Err(fault.err("start offset runs past its text node"));
                }
                return Ok(Location::new(node, offset));
            }
            NodeKind::Element(_) => {
                let children = tree.node(node).children();
                if offset > children.len() {
                    return Err(fault.err("start child index runs past its element"));
                }
                if offset == children.len() {
                    // boundary after the last child: end of the last leaf
                    let leaf = last_text_leaf(tree, node)
                        .ok_or_else(|| fault.err("range start is not anchored in text"))?;
                    return Ok(Location::new(leaf, tree.text_len(leaf).unwrap_or(0)));
                }
                node = children[offset];
                offset = 0;
            }
        }
    }
}

/// Mirror of [`descend_start`]: the end boundary maps to the last text
/// position before the indexed child.
fn descend_end(tree: &DocTree, loc: Location, fault: BoundaryFault) -> Result<Location> {
    let mut node = loc.node;
    let mut offset = loc.offset;
    loop {
        match tree.node(node).kind() {
            NodeKind::Text(_) => {
                let len = tree.text_len(node).unwrap_or(0);
                if offset > len {
                    return Err(fault.err("end offset runs past its text node"));
                }
                return Ok(Location::new(node, offset));
            }
            NodeKind::Element(_) => {
                let children = tree.node(node).children();
                if offset > children.len() {
                    return Err(fault.err("end child index runs past its element"));
                }
                if offset == 0 {
                    let leaf = first_text_leaf(tree, node)
                        .ok_or_else(|| fault.err("range end is not anchored in text"))?;
                    return Ok(Location::new(leaf, 0));
                }
                node = children[offset - 1];
                offset = match tree.node(node).kind() {
                    NodeKind::Text(_) => tree.text_len(node).unwrap_or(0),
                    NodeKind::Element(_) => tree.node(node).children().len(),
                };
            }
        }
    }
}

fn first_text_leaf(tree: &DocTree, id: NodeId) -> Option<NodeId> {
    tree.subtree(id).find(|&n| tree.node(n).is_text())
}

fn last_text_leaf(tree: &DocTree, id: NodeId) -> Option<NodeId> {
    tree.subtree(id).filter(|&n| tree.node(n).is_text()).last()
}

/// Document-order comparison of two distinct nodes under `root`.
fn precedes(tree: &DocTree, root: NodeId, a: NodeId, b: NodeId) -> bool {
    for node in tree.subtree(root) {
        if node == a {
            return true;
        }
        if node == b {
            return false;
        }
    }
    false
}
