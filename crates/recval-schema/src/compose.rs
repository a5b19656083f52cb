//! # Schema Composer
//!
//! Per-field validation: scalar fields go through coercion then
//! constraints, nested record fields recurse into their own schema, and
//! collection fields check their element count and then every element.
//!
//! All errors are reported relative to the value being validated. The
//! caller absorbs them under the field name or element index, so a failure
//! three levels deep surfaces as e.g. `crew[1].age`.

use recval_core::{FieldPath, TypedValue, ValidationError};
use serde_json::Value;

use crate::coerce::{coerce, CoercionError, CoercionMode, ScalarType};
use crate::collector::ErrorCollector;
use crate::constraint::{self, Subject};
use crate::field::{FieldSpec, FieldType};
use crate::schema::Schema;
use crate::validate;

/// Validate one top-level field. `raw` is `None` when the key is absent or
/// null; the default is substituted if declared.
pub(crate) fn validate_field(
    spec: &FieldSpec,
    raw: Option<&Value>,
    mode: CoercionMode,
    sink: &mut ErrorCollector,
) -> Option<TypedValue> {
    match (raw, spec.default_value()) {
        (Some(value), _) => validate_value(spec, value, mode, sink),
        (None, Some(default)) => validate_value(spec, default, mode, sink),
        (None, None) if spec.is_required() => {
            sink.push(ValidationError::missing_required(FieldPath::root()));
            None
        }
        (None, None) => None,
    }
}

/// Validate a present value against `spec`'s type and constraints.
pub(crate) fn validate_value(
    spec: &FieldSpec,
    raw: &Value,
    mode: CoercionMode,
    sink: &mut ErrorCollector,
) -> Option<TypedValue> {
    match spec.field_type() {
        FieldType::Record { schema } => validate_nested(schema, raw, sink),
        FieldType::List { element } => validate_collection(spec, element, raw, mode, sink),
        scalar => {
            let target = scalar.as_scalar()?;
            validate_scalar(spec, target, raw, mode, sink)
        }
    }
}

fn validate_scalar(
    spec: &FieldSpec,
    target: ScalarType<'_>,
    raw: &Value,
    mode: CoercionMode,
    sink: &mut ErrorCollector,
) -> Option<TypedValue> {
    let value = match coerce(raw, target, mode) {
        Ok(value) => value,
        Err(e) => {
            sink.push(ValidationError::type_coercion(FieldPath::root(), e.to_string()));
            return None;
        }
    };
    let violations =
        constraint::evaluate(Subject::Scalar(&value), spec.constraints(), Some(target));
    if violations.is_empty() {
        return Some(value);
    }
    for violation in violations {
        sink.push(ValidationError::constraint(FieldPath::root(), violation.message));
    }
    None
}

/// The nested schema's own strictness and unknown-field policy apply.
fn validate_nested(schema: &Schema, raw: &Value, sink: &mut ErrorCollector) -> Option<TypedValue> {
    match validate::run(schema, raw) {
        Ok(record) => Some(TypedValue::Record(record)),
        Err(child) => {
            sink.absorb(child);
            None
        }
    }
}

/// Count constraints first, then every element regardless of the count
/// outcome.
fn validate_collection(
    spec: &FieldSpec,
    element: &FieldSpec,
    raw: &Value,
    mode: CoercionMode,
    sink: &mut ErrorCollector,
) -> Option<TypedValue> {
    let Some(items) = raw.as_array() else {
        sink.push(ValidationError::type_coercion(
            FieldPath::root(),
            CoercionError::NotSequence.to_string(),
        ));
        return None;
    };

    let mut errors = ErrorCollector::new();
    for violation in constraint::evaluate(Subject::Items(items.len()), spec.constraints(), None) {
        errors.push(ValidationError::constraint(FieldPath::root(), violation.message));
    }

    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let mut element_errors = ErrorCollector::new();
        if let Some(value) = validate_value(element, item, mode, &mut element_errors) {
            values.push(value);
        }
        errors.absorb_under_index(index, element_errors);
    }

    let passed = errors.is_empty();
    sink.absorb(errors);
    passed.then_some(TypedValue::List(values))
}
