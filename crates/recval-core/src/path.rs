//! # Field Paths
//!
//! A [`FieldPath`] locates a value inside a record: a sequence of field
//! names and zero-based collection indices, rendered with dot/bracket
//! notation (`crew[1].years_experience`). The empty path is the record
//! root.
//!
//! Errors are produced relative to the value being validated and re-pathed
//! as they bubble up, so the common operation is *prefixing*.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field.
    Field(String),
    /// A zero-based collection index.
    Index(usize),
}

/// A dot/bracket-qualified location inside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The record root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-segment path naming a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parse dot/bracket notation. The empty string is the root.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPath {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        if s.is_empty() {
            return Ok(Self { segments });
        }

        let mut rest = s;
        while !rest.is_empty() {
            if rest.starts_with('[') {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| invalid("index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                continue;
            }

            if !segments.is_empty() {
                rest = rest
                    .strip_prefix('.')
                    .ok_or_else(|| invalid("expected '.' or '[' between segments"))?;
            }
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() || name.contains(']') {
                return Err(invalid("empty or malformed field name"));
            }
            segments.push(PathSegment::Field(name.to_string()));
            rest = &rest[end..];
        }

        Ok(Self { segments })
    }

    /// Whether this is the record root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first field name on the path, if any.
    pub fn head_field(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Field(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Extend this path with a child field.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Extend this path with a collection index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Place this path under a parent field.
    pub fn prefixed_field(mut self, name: &str) -> Self {
        self.segments.insert(0, PathSegment::Field(name.to_string()));
        self
    }

    /// Place this path under a collection index.
    pub fn prefixed_index(mut self, index: usize) -> Self {
        self.segments.insert(0, PathSegment::Index(index));
        self
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = PathSegment> {
        prop_oneof![
            "[a-z_][a-z0-9_]{0,8}".prop_map(PathSegment::Field),
            (0usize..1000).prop_map(PathSegment::Index),
        ]
    }

    proptest! {
        /// Any path built from segments renders to a string that parses back to it.
        #[test]
        fn rendered_paths_parse_back(segments in prop::collection::vec(segment(), 0..6)) {
            let path = FieldPath { segments };
            let parsed = FieldPath::parse(&path.to_string()).unwrap();
            prop_assert_eq!(parsed, path);
        }
    }
}
