//! Path codec: node + offset ⇄ structural path
//!
//! [`StepPathCodec`] encodes a location by walking from the node up to the
//! anchoring root, collecting child indices, and decodes by walking the
//! steps back down. Both directions validate the offset against the
//! resolved node so a stale offset surfaces as an error instead of a
//! misplaced split.

use thiserror::Error;

use super::parser::PathParseError;
use super::types::NodePath;
use crate::tree::{DocTree, NodeId, NodeKind};

/// A concrete boundary in a tree: a node plus an offset.
///
/// For a text node the offset counts characters; for an element it is a
/// child index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub node: NodeId,
    pub offset: usize,
}

impl Location {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Path codec errors
#[derive(Debug, Error)]
pub enum PathError {
    #[error("node is not inside the anchoring root")]
    OutOfTree,

    #[error("step {step} at depth {depth} does not resolve ({available} children available)")]
    UnresolvedStep {
        step: usize,
        depth: usize,
        available: usize,
    },

    #[error("offset {offset} out of range for node of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error(transparent)]
    Parse(#[from] PathParseError),
}

/// The two-function seam between anchoring and the path scheme.
///
/// Implementations must be deterministic and stable across structurally
/// identical trees, and satisfy `decode(root, encode(root, loc)) == loc`.
pub trait PathCodec {
    fn encode(&self, tree: &DocTree, root: NodeId, location: Location)
        -> Result<NodePath, PathError>;

    fn decode(&self, tree: &DocTree, root: NodeId, path: &NodePath)
        -> Result<Location, PathError>;
}

/// Default codec: child-index steps relative to the anchoring root.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepPathCodec;

impl StepPathCodec {
    fn check_offset(tree: &DocTree, node: NodeId, offset: usize) -> Result<(), PathError> {
        let len = match tree.node(node).kind() {
            NodeKind::Text(_) => tree.text_len(node).unwrap_or(0),
            NodeKind::Element(_) => tree.node(node).children().len(),
        };
        if offset > len {
            return Err(PathError::OffsetOutOfRange { offset, len });
        }
        Ok(())
    }
}

impl PathCodec for StepPathCodec {
    fn encode(
        &self,
        tree: &DocTree,
        root: NodeId,
        location: Location,
    ) -> Result<NodePath, PathError> {
        if !tree.is_within(root, location.node) {
            return Err(PathError::OutOfTree);
        }
        Self::check_offset(tree, location.node, location.offset)?;

        let mut steps = Vec::new();
        let mut cur = location.node;
        while cur != root {
            // is_within above guarantees a parent and an index exist
            steps.push(tree.child_index(cur).unwrap());
            cur = tree.parent(cur).unwrap();
        }
        steps.reverse();

        Ok(NodePath::with_offset(steps, location.offset))
    }

    fn decode(
        &self,
        tree: &DocTree,
        root: NodeId,
        path: &NodePath,
    ) -> Result<Location, PathError> {
        let mut cur = root;
        for (depth, &step) in path.steps().iter().enumerate() {
            let children = tree.node(cur).children();
            if step >= children.len() {
                return Err(PathError::UnresolvedStep {
                    step,
                    depth,
                    available: children.len(),
                });
            }
            cur = children[step];
        }

        let offset = path.offset().unwrap_or(0);
        Self::check_offset(tree, cur, offset)?;

        Ok(Location::new(cur, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_document;

    fn sample() -> DocTree {
        parse_document("<body><p>alpha <em>beta</em> gamma</p><p>delta</p></body>").unwrap()
    }

    #[test]
    fn test_encode_decode_round_trip_every_location() {
        let tree = sample();
        let codec = StepPathCodec;
        let root = tree.root();
        for node in tree.subtree(root).collect::<Vec<_>>() {
            let len = match tree.node(node).kind() {
                NodeKind::Text(_) => tree.text_len(node).unwrap(),
                NodeKind::Element(_) => tree.node(node).children().len(),
            };
            for offset in 0..=len {
                let loc = Location::new(node, offset);
                let path = codec.encode(&tree, root, loc).unwrap();
                assert_eq!(codec.decode(&tree, root, &path).unwrap(), loc);
            }
        }
    }

    #[test]
    fn test_paths_survive_cloning() {
        let tree = sample();
        let codec = StepPathCodec;
        let root = tree.root();
        let p = tree.children(root)[0];
        let em = tree.children(p)[1];
        let beta = tree.children(em)[0];

        let path = codec.encode(&tree, root, Location::new(beta, 2)).unwrap();
        assert_eq!(path.to_string(), "/0/1/0:2");

        let clone = tree.clone();
        let resolved = codec.decode(&clone, clone.root(), &path).unwrap();
        assert_eq!(resolved, Location::new(beta, 2));
    }

    #[test]
    fn test_paths_resolve_against_reparsed_document() {
        let tree = sample();
        let codec = StepPathCodec;
        let p = tree.children(tree.root())[0];
        let em = tree.children(p)[1];
        let beta = tree.children(em)[0];
        let path = codec
            .encode(&tree, tree.root(), Location::new(beta, 4))
            .unwrap();

        // a structurally identical tree from an independent parse
        let other = sample();
        let resolved = codec.decode(&other, other.root(), &path).unwrap();
        assert_eq!(
            other.node(resolved.node).text(),
            Some("beta"),
            "path must land on the equivalent node"
        );
        assert_eq!(resolved.offset, 4);
    }

    #[test]
    fn test_encode_rejects_node_outside_root() {
        let tree = sample();
        let codec = StepPathCodec;
        let p = tree.children(tree.root())[0];
        // anchoring root is a subtree that does not contain the tree root
        let err = codec.encode(&tree, p, Location::new(tree.root(), 0));
        assert!(matches!(err, Err(PathError::OutOfTree)));
    }

    #[test]
    fn test_decode_unresolved_step() {
        let tree = sample();
        let codec = StepPathCodec;
        let path: NodePath = "/0/9".parse().unwrap();
        let err = codec.decode(&tree, tree.root(), &path).unwrap_err();
        assert!(matches!(
            err,
            PathError::UnresolvedStep {
                step: 9,
                depth: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_validation() {
        let tree = sample();
        let codec = StepPathCodec;
        let root = tree.root();
        let p = tree.children(root)[0];
        let alpha = tree.children(p)[0];

        let err = codec.encode(&tree, root, Location::new(alpha, 99));
        assert!(matches!(err, Err(PathError::OffsetOutOfRange { .. })));

        let path: NodePath = "/0/0:99".parse().unwrap();
        let err = codec.decode(&tree, root, &path).unwrap_err();
        assert!(matches!(err, PathError::OffsetOutOfRange { .. }));
    }

    #[test]
    fn test_root_path() {
        let tree = sample();
        let codec = StepPathCodec;
        let root = tree.root();
        let path = codec.encode(&tree, root, Location::new(root, 1)).unwrap();
        assert_eq!(path.to_string(), "/:1");
        assert_eq!(
            codec.decode(&tree, root, &path).unwrap(),
            Location::new(root, 1)
        );
    }
}
