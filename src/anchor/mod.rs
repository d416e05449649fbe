//! Anchoring operations
//!
//! The three operations at the heart of durable anchoring:
//!
//! - [`capture`] turns a live range into a [`StoredSelector`]
//! - [`replace`] / [`replace_range`] substitute a span with new markup on a
//!   clone of the tree
//! - [`resolve`] re-locates the marker element a [`TextQuoteSelector`]
//!   designates
//!
//! All three are synchronous single-pass reads; the only mutation happens on
//! a private clone owned by the replace call, so the caller's tree is never
//! touched.
//!
//! [`StoredSelector`]: crate::selector::StoredSelector
//! [`TextQuoteSelector`]: crate::selector::TextQuoteSelector

mod capture;
mod replace;
mod resolve;

pub use capture::capture;
pub use replace::{replace, replace_range};
pub use resolve::resolve;

use crate::tree::NodeId;

/// An ephemeral selection range: two boundaries, each a node plus offset.
///
/// This is the portable shape of a platform selection object — offsets count
/// characters in text nodes and child indices in elements. Owned by the
/// caller and never retained by the core past a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start_node: NodeId,
    pub start_offset: usize,
    pub end_node: NodeId,
    pub end_offset: usize,
}

impl Range {
    pub fn new(start_node: NodeId, start_offset: usize, end_node: NodeId, end_offset: usize) -> Self {
        Self {
            start_node,
            start_offset,
            end_node,
            end_offset,
        }
    }

    /// A range whose boundaries coincide selects nothing.
    pub fn is_collapsed(&self) -> bool {
        self.start_node == self.end_node && self.start_offset == self.end_offset
    }
}
