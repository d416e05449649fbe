//! Selection capture
//!
//! Turns a live range into a [`StoredSelector`]: two structural paths, the
//! two offsets, and the exact text the range spans.

use tracing::trace;

use super::Range;
use crate::error::{AnchorError, Result};
use crate::path::{Location, PathCodec};
use crate::selector::StoredSelector;
use crate::tree::{DocTree, NodeId, TextMap};

/// Capture a range relative to `root` into a stored selector.
///
/// Fails with [`AnchorError::InvalidRange`] when the range is collapsed,
/// reversed, or has a boundary outside `root`. Pure and synchronous;
/// malformed input is a programmer/UI error, not a recoverable condition.
pub fn capture(
    tree: &DocTree,
    root: NodeId,
    range: &Range,
    codec: &impl PathCodec,
) -> Result<StoredSelector> {
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

    let start = codec.encode(tree, root, Location::new(range.start_node, range.start_offset))?;
    let end = codec.encode(tree, root, Location::new(range.end_node, range.end_offset))?;

    let map = TextMap::build(tree, root);
    let from = map
        .position(tree, range.start_node, range.start_offset)
        .ok_or_else(|| AnchorError::InvalidRange("start offset out of range".into()))?;
    let to = map
        .position(tree, range.end_node, range.end_offset)
        .ok_or_else(|| AnchorError::InvalidRange("end offset out of range".into()))?;
    if from > to {
        return Err(AnchorError::InvalidRange(
            "range end precedes range start".into(),
        ));
    }

    let exact_match = map.slice(from, to);
    trace!(%start, %end, exact = %exact_match, "captured selection");

    Ok(StoredSelector {
        start,
        end,
        start_offset: range.start_offset,
        end_offset: range.end_offset,
        exact_match,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_document;
    use crate::path::StepPathCodec;

    fn sample() -> DocTree {
        parse_document("<body><p>alpha <em>beta</em> gamma</p><p>delta</p></body>").unwrap()
    }

    #[test]
    fn test_capture_within_one_text_node() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        let alpha = tree.children(p)[0];
        let range = Range::new(alpha, 0, alpha, 5);
        let selector = capture(&tree, tree.root(), &range, &StepPathCodec).unwrap();
        assert_eq!(selector.exact_match, "alpha");
        assert_eq!(selector.start.to_string(), "/0/0:0");
        assert_eq!(selector.end.to_string(), "/0/0:5");
        assert_eq!((selector.start_offset, selector.end_offset), (0, 5));
    }

    #[test]
    fn test_capture_across_element_boundaries() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        let alpha = tree.children(p)[0];
        let gamma = tree.children(p)[2];
        // from inside "alpha " across <em>beta</em> into " gamma"
        let range = Range::new(alpha, 2, gamma, 4);
        let selector = capture(&tree, tree.root(), &range, &StepPathCodec).unwrap();
        assert_eq!(selector.exact_match, "pha beta gam");
    }

    #[test]
    fn test_capture_element_boundary_offsets() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        // child indices 1..3 of <p>: the <em> and the trailing text
        let range = Range::new(p, 1, p, 3);
        let selector = capture(&tree, tree.root(), &range, &StepPathCodec).unwrap();
        assert_eq!(selector.exact_match, "beta gamma");
    }

    #[test]
    fn test_capture_collapsed_range() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        let alpha = tree.children(p)[0];
        let err = capture(
            &tree,
            tree.root(),
            &Range::new(alpha, 3, alpha, 3),
            &StepPathCodec,
        )
        .unwrap_err();
        assert!(matches!(err, AnchorError::InvalidRange(_)));
    }

    #[test]
    fn test_capture_reversed_range() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        let alpha = tree.children(p)[0];
        let err = capture(
            &tree,
            tree.root(),
            &Range::new(alpha, 5, alpha, 1),
            &StepPathCodec,
        )
        .unwrap_err();
        assert!(matches!(err, AnchorError::InvalidRange(_)));
    }

    #[test]
    fn test_capture_outside_root() {
        let tree = sample();
        let p1 = tree.children(tree.root())[0];
        let p2 = tree.children(tree.root())[1];
        let delta = tree.children(p2)[0];
        // anchoring root is the first paragraph; range lives in the second
        let err = capture(&tree, p1, &Range::new(delta, 0, delta, 3), &StepPathCodec).unwrap_err();
        assert!(matches!(err, AnchorError::InvalidRange(_)));
    }

    #[test]
    fn test_captured_paths_decode_to_range() {
        let tree = sample();
        let p = tree.children(tree.root())[0];
        let em = tree.children(p)[1];
        let beta = tree.children(em)[0];
        let range = Range::new(beta, 1, beta, 3);
        let selector = capture(&tree, tree.root(), &range, &StepPathCodec).unwrap();

        let codec = StepPathCodec;
        let start = codec.decode(&tree, tree.root(), &selector.start).unwrap();
        let end = codec.decode(&tree, tree.root(), &selector.end).unwrap();
        assert_eq!(start, Location::new(beta, 1));
        assert_eq!(end, Location::new(beta, 3));
        assert_eq!(selector.exact_match, "et");
    }
}
