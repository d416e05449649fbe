//! Selector wire formats and marker elements
//!
//! Selectors are plain serializable records with no embedded behavior: they
//! travel to the persistence layer as JSON and come back when an annotated
//! document is re-rendered. Marker elements are the nodes those selectors
//! designate — elements carrying the `about` / `property` / `resource`
//! attribute triple.

mod marker;
mod types;

pub use marker::{Marker, ABOUT_ATTR, PROPERTY_ATTR, RESOURCE_ATTR, TYPEOF_ATTR};
pub use types::{MarkerKind, StoredSelector, TextQuoteSelector};
