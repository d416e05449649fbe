//! Structural paths
//!
//! A [`NodePath`] addresses a node within a tree by child-index steps,
//! optionally with a character offset into the addressed node:
//!
//! ```text
//! /0/2/1:17
//! │ │ │ └── character offset 17
//! │ │ └──── second child
//! │ └────── third child
//! └──────── first child of the anchoring root
//! ```
//!
//! Paths reference structure, never live node identity, so a path captured
//! against one tree resolves against any structurally identical tree — a
//! clone, or a later re-fetch of the same document. The [`PathCodec`] trait
//! is the narrow seam for swapping the path scheme; [`StepPathCodec`] is the
//! default implementation and any codec satisfying the round-trip property
//! substitutes for it.

mod codec;
mod parser;
mod types;

pub use codec::{Location, PathCodec, PathError, StepPathCodec};
pub use parser::{parse, PathParseError};
pub use types::NodePath;
