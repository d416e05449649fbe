//! Glossmark — durable text anchoring
//!
//! Converts selections inside a rendered document into serializable
//! descriptors that can be stored, shipped to a server, and later replayed —
//! possibly against a different rendering of the same content — to the exact
//! span they originally designated. This is the mechanism behind marking
//! term occurrences and term definitions inside analyzed documents.
//!
//! # Modules
//!
//! - `tree`: arena document tree, text flattening
//! - `markup`: markup fragments in and out of the arena
//! - `path`: structural paths and the swappable path codec
//! - `selector`: selector wire formats and marker elements
//! - `anchor`: capture, replace and resolve operations
//!
//! # Example
//!
//! ```
//! use glossmark::{capture, replace, resolve};
//! use glossmark::{Marker, MarkerKind, Range, StepPathCodec, TextQuoteSelector};
//!
//! let tree = glossmark::markup::parse_document("<body><p>the visual cortex</p></body>")?;
//! let p = tree.children(tree.root())[0];
//! let text = tree.children(p)[0];
//!
//! // capture a selection of "cortex" and wrap it in a marker
//! let range = Range::new(text, 11, text, 17);
//! let stored = capture(&tree, tree.root(), &range, &StepPathCodec)?;
//! let marker = Marker::new(MarkerKind::Occurrence, "terms/cortex");
//! let annotated = replace(
//!     &tree,
//!     tree.root(),
//!     &stored,
//!     &marker.to_markup(&stored.exact_match),
//!     &StepPathCodec,
//! )?;
//!
//! // later, re-locate the marker from its text quote
//! let selector = TextQuoteSelector::exact("cortex").with_context(Some("visual "), None);
//! let found = resolve(&annotated, annotated.root(), &selector)?;
//! assert_eq!(Marker::from_element(&annotated, found).unwrap().kind, MarkerKind::Occurrence);
//! # Ok::<(), glossmark::AnchorError>(())
//! ```

pub mod anchor;
pub mod error;
pub mod markup;
pub mod path;
pub mod selector;
pub mod tree;

pub use anchor::{capture, replace, replace_range, resolve, Range};
pub use error::{AnchorError, Result};
pub use path::{Location, NodePath, PathCodec, StepPathCodec};
pub use selector::{Marker, MarkerKind, StoredSelector, TextQuoteSelector};
pub use tree::{DocTree, ElementData, Node, NodeId, NodeKind};
