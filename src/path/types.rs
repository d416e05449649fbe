//! Structural path value type

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::parser::{parse, PathParseError};

/// A structural path: child-index steps from an anchoring root, plus an
/// optional character offset into the addressed node.
///
/// An empty step list addresses the root itself. Serializes as its string
/// form (`"/0/2/1:17"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    steps: Vec<usize>,
    offset: Option<usize>,
}

impl NodePath {
    pub fn new(steps: Vec<usize>) -> Self {
        Self {
            steps,
            offset: None,
        }
    }

    pub fn with_offset(steps: Vec<usize>, offset: usize) -> Self {
        Self {
            steps,
            offset: Some(offset),
        }
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            write!(f, "/")?;
        } else {
            for step in &self.steps {
                write!(f, "/{}", step)?;
            }
        }
        if let Some(offset) = self.offset {
            write!(f, ":{}", offset)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodePath::new(vec![0, 2, 1]).to_string(), "/0/2/1");
        assert_eq!(NodePath::with_offset(vec![0, 2], 17).to_string(), "/0/2:17");
        assert_eq!(NodePath::new(vec![]).to_string(), "/");
        assert_eq!(NodePath::with_offset(vec![], 3).to_string(), "/:3");
    }

    #[test]
    fn test_parse_round_trip() {
        for source in ["/", "/0", "/0/2/1", "/0/2/1:17", "/:3"] {
            let path: NodePath = source.parse().unwrap();
            assert_eq!(path.to_string(), source);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let path = NodePath::with_offset(vec![1, 0], 5);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/1/0:5\"");
        let back: NodePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        assert!(serde_json::from_str::<NodePath>("\"1/2\"").is_err());
    }
}
