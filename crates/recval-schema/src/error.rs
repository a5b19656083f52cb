//! # Schema Errors
//!
//! [`SchemaError`] reports a malformed schema at construction time.
//! [`ValidationErrors`] is the failure side of a validation run: the
//! ordered, non-empty list of [`ValidationError`]s.

use std::fmt::Write as _;

use recval_core::{ErrorKind, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// A schema could not be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two fields in one schema share a name.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// The repeated field name.
        field: String,
    },

    /// A field name cannot be rendered unambiguously in a path.
    #[error("schema '{schema}' field name {field:?} is empty or contains '.', '[' or ']'")]
    InvalidFieldName {
        /// Schema name.
        schema: String,
        /// The rejected field name.
        field: String,
    },

    /// A constraint's bound does not match the field's semantic type.
    #[error("field '{field}': constraint '{constraint}' cannot apply to a {field_type} field")]
    BoundTypeMismatch {
        /// Field name.
        field: String,
        /// Constraint tag.
        constraint: String,
        /// Declared field type.
        field_type: String,
    },

    /// A bound is unusable (NaN, inverted range, empty set).
    #[error("field '{field}': {reason}")]
    InvalidBound {
        /// Field name.
        field: String,
        /// What is wrong with the bound.
        reason: String,
    },

    /// An enum field has no symbols or repeats one.
    #[error("field '{field}': {reason}")]
    InvalidSymbols {
        /// Field name.
        field: String,
        /// What is wrong with the symbol set.
        reason: String,
    },

    /// A default value does not coerce to the field's type.
    #[error("field '{field}': default value is not a valid {field_type}: {reason}")]
    InvalidDefault {
        /// Field name.
        field: String,
        /// Declared field type.
        field_type: String,
        /// Coercion failure message.
        reason: String,
    },

    /// Two invariant rules share a name.
    #[error("schema '{schema}' declares invariant '{rule}' more than once")]
    DuplicateInvariant {
        /// Schema name.
        schema: String,
        /// The repeated rule name.
        rule: String,
    },

    /// An invariant's declared path does not start at a declared field.
    #[error("schema '{schema}' invariant '{rule}' targets undeclared field path '{path}'")]
    UnknownInvariantPath {
        /// Schema name.
        schema: String,
        /// Rule name.
        rule: String,
        /// The declared path.
        path: String,
    },
}

/// The ordered, non-empty list of failures from one validation run.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{} for {schema}\n{}", summary(.errors.len()), listing(.errors))]
pub struct ValidationErrors {
    schema: String,
    errors: Vec<ValidationError>,
}

fn summary(count: usize) -> String {
    if count == 1 {
        "1 validation error".to_string()
    } else {
        format!("{count} validation errors")
    }
}

fn listing(errors: &[ValidationError]) -> String {
    let mut out = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "  {e}");
    }
    out
}

impl ValidationErrors {
    /// Wrap a collected error list. Callers guarantee `errors` is non-empty.
    pub(crate) fn new(schema: impl Into<String>, errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            schema: schema.into(),
            errors,
        }
    }

    /// Name of the schema that rejected the payload.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// All failures, in encounter order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for a value returned by the engine.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Failures of one kind, in encounter order.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind() == kind)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recval_core::FieldPath;

    #[test]
    fn test_display_lists_every_error() {
        let errs = ValidationErrors::new(
            "space_station",
            vec![
                ValidationError::constraint(
                    FieldPath::field("crew_size"),
                    "Input should be less than or equal to 20",
                ),
                ValidationError::missing_required(FieldPath::field("name")),
            ],
        );
        let display = errs.to_string();
        assert!(display.starts_with("2 validation errors for space_station"));
        assert!(
            display.contains("crew_size: Input should be less than or equal to 20 [constraint]")
        );
        assert!(display.contains("name: Field required [missing-required]"));
    }

    #[test]
    fn test_singular_summary() {
        let errs = ValidationErrors::new(
            "s",
            vec![ValidationError::missing_required(FieldPath::field("a"))],
        );
        assert!(errs.to_string().starts_with("1 validation error for s\n"));
    }

    #[test]
    fn test_of_kind_filters() {
        let errs = ValidationErrors::new(
            "s",
            vec![
                ValidationError::missing_required(FieldPath::field("a")),
                ValidationError::constraint(FieldPath::field("b"), "x"),
                ValidationError::missing_required(FieldPath::field("c")),
            ],
        );
        let missing: Vec<String> = errs
            .of_kind(ErrorKind::MissingRequired)
            .map(|e| e.path().to_string())
            .collect();
        assert_eq!(missing, vec!["a", "c"]);
    }

    #[test]
    fn test_schema_error_messages() {
        let err = SchemaError::BoundTypeMismatch {
            field: "name".into(),
            constraint: "minimum".into(),
            field_type: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'name': constraint 'minimum' cannot apply to a string field"
        );
    }
}
