//! Marker elements
//!
//! A marker is an element carrying three attributes: an opaque local
//! identifier (`about`), the relation kind (`property`) and the referenced
//! subject (`resource`, with `typeof` accepted as a legacy spelling).
//! Markers are created by the analysis backend or materialized through the
//! range replacer; resolution only ever reads them.

use uuid::Uuid;

use super::types::MarkerKind;
use crate::tree::{DocTree, NodeId};

pub const ABOUT_ATTR: &str = "about";
pub const PROPERTY_ATTR: &str = "property";
pub const RESOURCE_ATTR: &str = "resource";
pub const TYPEOF_ATTR: &str = "typeof";

/// Typed view of a marker element's attribute triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Opaque local identifier of the marker
    pub about: String,
    pub kind: MarkerKind,
    /// Identifier of the referenced subject (the term)
    pub resource: String,
}

impl Marker {
    /// Create a marker with a fresh blank identifier.
    pub fn new(kind: MarkerKind, resource: impl Into<String>) -> Self {
        Self {
            about: format!("_:{}", Uuid::new_v4().simple()),
            kind,
            resource: resource.into(),
        }
    }

    /// Read the marker triple off an element, or `None` when the element
    /// does not carry a recognized `property` token.
    pub fn from_element(tree: &DocTree, id: NodeId) -> Option<Self> {
        let kind = MarkerKind::from_property(tree.attr(id, PROPERTY_ATTR)?)?;
        let resource = tree
            .attr(id, RESOURCE_ATTR)
            .or_else(|| tree.attr(id, TYPEOF_ATTR))?;
        Some(Self {
            about: tree.attr(id, ABOUT_ATTR).unwrap_or_default().to_string(),
            kind,
            resource: resource.to_string(),
        })
    }

    /// Materialize marker markup wrapping the given text, suitable as
    /// replacement markup for the range replacer.
    pub fn to_markup(&self, text: &str) -> String {
        format!(
            r#"<span {}="{}" {}="{}" {}="{}">{}</span>"#,
            ABOUT_ATTR,
            html_escape::encode_double_quoted_attribute(&self.about),
            PROPERTY_ATTR,
            self.kind.property(),
            RESOURCE_ATTR,
            html_escape::encode_double_quoted_attribute(&self.resource),
            html_escape::encode_text(text),
        )
    }

    /// All marker elements under `root` in document order, filtered to the
    /// given kinds (an empty list means any kind).
    pub fn find_all(tree: &DocTree, root: NodeId, kinds: &[MarkerKind]) -> Vec<NodeId> {
        tree.subtree(root)
            .filter(|&id| match Self::from_element(tree, id) {
                Some(marker) => kinds.is_empty() || kinds.contains(&marker.kind),
                None => false,
            })
            .collect()
    }
}
