//! Selector types
//!
//! Two descriptor shapes serve two moments in a marker's life. A
//! [`StoredSelector`] is position-based: structural paths plus offsets,
//! captured from a live selection and replayed against a structurally
//! identical tree. A [`TextQuoteSelector`] is content-based: the exact
//! quoted text plus short context windows, robust against re-rendering and
//! resolved by the staged disambiguation algorithm.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::NodePath;

/// The relation a marker element asserts about its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// The span is an occurrence of a term
    #[serde(rename = "is-occurrence-of")]
    Occurrence,
    /// The span defines a term
    #[serde(rename = "is-definition-of")]
    Definition,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 2] = [MarkerKind::Occurrence, MarkerKind::Definition];

    /// The `property` attribute token for this kind.
    pub fn property(self) -> &'static str {
        match self {
            MarkerKind::Occurrence => "is-occurrence-of",
            MarkerKind::Definition => "is-definition-of",
        }
    }

    pub fn from_property(token: &str) -> Option<Self> {
        match token {
            "is-occurrence-of" => Some(MarkerKind::Occurrence),
            "is-definition-of" => Some(MarkerKind::Definition),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property())
    }
}

/// Position-based descriptor of a captured range.
///
/// The paths resolve against any tree with the same structural shape as the
/// capture-time root. `exact_match` records the flattened text of the range
/// at capture time; it is a sanity and disambiguation aid, never the source
/// of truth for re-resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSelector {
    pub start: NodePath,
    pub end: NodePath,
    pub start_offset: usize,
    pub end_offset: usize,
    pub exact_match: String,
}

/// Content-based descriptor: exact quote plus optional context windows.
///
/// `prefix` and `suffix` are short windows of text immediately surrounding
/// the quote in the original source. They only disambiguate between
/// textually identical candidates; they never locate text by themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuoteSelector {
    pub exact_match: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Marker kinds this selector may designate; empty means any kind.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<MarkerKind>,
}

impl TextQuoteSelector {
    pub fn exact(exact_match: impl Into<String>) -> Self {
        Self {
            exact_match: exact_match.into(),
            prefix: None,
            suffix: None,
            types: Vec::new(),
        }
    }

    pub fn with_context(mut self, prefix: Option<&str>, suffix: Option<&str>) -> Self {
        self.prefix = prefix.map(|s| s.to_string());
        self.suffix = suffix.map(|s| s.to_string());
        self
    }

    pub fn with_types(mut self, types: Vec<MarkerKind>) -> Self {
        self.types = types;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_kind_tokens() {
        assert_eq!(MarkerKind::Occurrence.property(), "is-occurrence-of");
        assert_eq!(MarkerKind::Definition.property(), "is-definition-of");
        assert_eq!(
            MarkerKind::from_property("is-occurrence-of"),
            Some(MarkerKind::Occurrence)
        );
        assert_eq!(MarkerKind::from_property("unrelated"), None);
    }

    #[test]
    fn test_stored_selector_wire_format() {
        let selector = StoredSelector {
            start: "/0/1/0:2".parse().unwrap(),
            end: "/0/2:5".parse().unwrap(),
            start_offset: 2,
            end_offset: 5,
            exact_match: "ta gam".to_string(),
        };
        let json = serde_json::to_value(&selector).unwrap();
        assert_eq!(json["start"], "/0/1/0:2");
        assert_eq!(json["startOffset"], 2);
        assert_eq!(json["exactMatch"], "ta gam");

        let back: StoredSelector = serde_json::from_value(json).unwrap();
        assert_eq!(back, selector);
    }

    #[test]
    fn test_quote_selector_wire_format() {
        let selector = TextQuoteSelector::exact("habeas corpus")
            .with_context(Some("writ of "), None)
            .with_types(vec![MarkerKind::Definition]);
        let json = serde_json::to_string(&selector).unwrap();
        assert!(json.contains("\"exactMatch\":\"habeas corpus\""));
        assert!(json.contains("\"prefix\":\"writ of \""));
        assert!(!json.contains("suffix"));
        assert!(json.contains("is-definition-of"));

        let back: TextQuoteSelector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selector);
    }

    #[test]
    fn test_quote_selector_minimal_json() {
        let back: TextQuoteSelector =
            serde_json::from_str(r#"{"exactMatch":"term"}"#).unwrap();
        assert_eq!(back, TextQuoteSelector::exact("term"));
    }
}
