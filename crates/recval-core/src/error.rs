//! # Error Types — Structured Failure Data
//!
//! Two families live here:
//!
//! - [`CoreError`] — ordinary Rust errors raised by this crate's own
//!   constructors (timestamp parsing, path parsing, serialization).
//! - [`ValidationError`] — a validation *failure*, returned to callers as
//!   data. It carries a field path, a failure kind and a message, and is
//!   never thrown.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::FieldPath;

/// Top-level error type for recval-core constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A string could not be interpreted as a timestamp.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A string could not be interpreted as a field path.
    #[error("invalid field path {input:?}: {reason}")]
    InvalidPath {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// The four failure kinds a validation run can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// A required field was absent and had no default.
    MissingRequired,
    /// A value was present but could not be converted to the declared type.
    TypeCoercion,
    /// A coerced value violated a declared per-field constraint.
    Constraint,
    /// A cross-field rule failed on an otherwise valid record.
    Invariant,
}

impl ErrorKind {
    /// Returns the wire name of this kind (e.g. `"missing-required"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "missing-required",
            ErrorKind::TypeCoercion => "type-coercion",
            ErrorKind::Constraint => "constraint",
            ErrorKind::Invariant => "invariant",
        }
    }

    /// Whether this kind is produced during the field phase.
    pub fn is_field_level(&self) -> bool {
        !matches!(self, ErrorKind::Invariant)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
///
/// Fields are private: an error is immutable once built. Moving an error
/// under a parent field or collection index goes through
/// [`nested_under_field`](Self::nested_under_field) and
/// [`nested_under_index`](Self::nested_under_index), which consume the
/// error and return the re-pathed copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    path: FieldPath,
    kind: ErrorKind,
    message: String,
    /// Name of the invariant rule that produced this error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
}

impl ValidationError {
    /// Build an error of any kind.
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            rule: None,
        }
    }

    /// A required field was absent.
    pub fn missing_required(path: FieldPath) -> Self {
        Self::new(path, ErrorKind::MissingRequired, "Field required")
    }

    /// A value could not be coerced to its declared type.
    pub fn type_coercion(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::TypeCoercion, message)
    }

    /// A declared constraint was violated.
    pub fn constraint(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::Constraint, message)
    }

    /// A cross-field rule failed.
    pub fn invariant(path: FieldPath, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::Invariant,
            message: message.into(),
            rule: Some(rule.into()),
        }
    }

    /// Path of the failing value, relative to the validated record.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Failure kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The invariant rule name, for `invariant` errors.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Re-path this error under a parent field.
    pub fn nested_under_field(self, field: &str) -> Self {
        Self {
            path: self.path.prefixed_field(field),
            ..self
        }
    }

    /// Re-path this error under a collection index.
    pub fn nested_under_index(self, index: usize) -> Self {
        Self {
            path: self.path.prefixed_index(index),
            ..self
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {} [{}]", self.message, self.kind)
        } else {
            write!(f, "{}: {} [{}]", self.path, self.message, self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(ErrorKind::MissingRequired.as_str(), "missing-required");
        assert_eq!(ErrorKind::TypeCoercion.as_str(), "type-coercion");
        assert_eq!(ErrorKind::Constraint.as_str(), "constraint");
        assert_eq!(ErrorKind::Invariant.as_str(), "invariant");
    }

    #[test]
    fn test_kind_serde_matches_wire_names() {
        let json = serde_json::to_string(&ErrorKind::TypeCoercion).unwrap();
        assert_eq!(json, r#""type-coercion""#);
        let parsed: ErrorKind = serde_json::from_str(r#""missing-required""#).unwrap();
        assert_eq!(parsed, ErrorKind::MissingRequired);
    }

    #[test]
    fn test_field_level_kinds() {
        assert!(ErrorKind::Constraint.is_field_level());
        assert!(!ErrorKind::Invariant.is_field_level());
    }

    #[test]
    fn test_repath_field_then_index() {
        let err = ValidationError::constraint(FieldPath::field("years_experience"), "too many")
            .nested_under_index(1)
            .nested_under_field("crew");
        assert_eq!(err.path().to_string(), "crew[1].years_experience");
        assert_eq!(err.kind(), ErrorKind::Constraint);
        assert_eq!(err.message(), "too many");
    }

    #[test]
    fn test_missing_required_message() {
        let err = ValidationError::missing_required(FieldPath::field("name"));
        assert_eq!(err.message(), "Field required");
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn test_display_root_and_nested() {
        let root = ValidationError::invariant(FieldPath::root(), "id_prefix", "bad id");
        assert_eq!(root.to_string(), "(root): bad id [invariant]");
        let nested = ValidationError::type_coercion(FieldPath::field("age"), "not a number");
        assert_eq!(nested.to_string(), "age: not a number [type-coercion]");
    }

    #[test]
    fn test_serialize_contract() {
        let err = ValidationError::constraint(
            FieldPath::field("crew_size"),
            "Input should be less than or equal to 20",
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["path"], "crew_size");
        assert_eq!(json["kind"], "constraint");
        assert_eq!(json["message"], "Input should be less than or equal to 20");
        assert!(json.get("rule").is_none());

        let inv = ValidationError::invariant(FieldPath::root(), "id_prefix", "bad");
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["path"], "");
        assert_eq!(json["rule"], "id_prefix");
    }
}
