//! NodePath parsing and formatting.
//!
//! Grammar: `name/name/.../name`, each segment a node name relative to a root.
//! The empty string is valid and means the root itself.
//!   "" -> segments=[]
//!   "Body/Arm" -> segments=["Body","Arm"]
//!
//! Resolution against a concrete tree is left to the tree owner.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid node path '{0}': empty segment")]
    EmptySegment(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    /// The path naming the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for seg in s.split('/') {
            if seg.is_empty() {
                return Err(PathError::EmptySegment(s.to_string()));
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for NodePath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodePath::parse(s)
    }
}

impl Serialize for NodePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D>(deserializer: D) -> Result<NodePath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NodePath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_root() {
        let p = NodePath::parse("").unwrap();
        assert!(p.is_root());
        assert_eq!(p.to_string(), "");
    }

    #[test]
    fn parse_nested() {
        let p = NodePath::parse("Body/Arm/Hand").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["Body", "Arm", "Hand"]);
        assert_eq!(p.to_string(), "Body/Arm/Hand");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(NodePath::parse("Body//Hand").is_err());
        assert!(NodePath::parse("Body/").is_err());
    }

    #[test]
    fn serde_as_string() {
        let p: NodePath = serde_json::from_str("\"A/B\"").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"A/B\"");
    }
}
