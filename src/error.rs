//! Error types for the anchoring core
//!
//! None of these are retried internally: a new selection or a document
//! re-analysis can only be offered by a layer above this crate, so every
//! failure is surfaced synchronously to the caller.

use thiserror::Error;

use crate::markup::MarkupError;
use crate::path::PathError;
use crate::selector::TextQuoteSelector;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, AnchorError>;

/// Anchoring error type
#[derive(Debug, Error)]
pub enum AnchorError {
    /// Collapsed or out-of-root range handed to capture or replace.
    /// A programmer/UI error, never recoverable by retrying.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A stored path no longer resolves against the current tree shape.
    /// The caller should prompt for re-selection or re-analysis.
    #[error("stale selector: {0}")]
    StaleSelector(String),

    /// No marker text matches the selector after all disambiguation stages.
    #[error("no marker matches selector (exact: {:?})", .selector.exact_match)]
    NotFound { selector: TextQuoteSelector },

    /// Strict matching found several candidates and context could not
    /// narrow them to one.
    #[error("selector is ambiguous: {count} candidates match {:?}", .selector.exact_match)]
    Ambiguous {
        selector: TextQuoteSelector,
        count: usize,
    },

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),
}
