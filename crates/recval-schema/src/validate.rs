//! # Record Validator
//!
//! Orchestrates one validation run as a two-phase state machine:
//!
//! ```text
//! CollectingFields ──(no field errors)──▶ CheckingInvariants ──▶ Ok(record)
//!        │                                        │
//!        └──(any field error)──▶ Err              └──(any rule fails)──▶ Err
//! ```
//!
//! Each phase is its own type and consumes itself on transition, so the
//! invariant phase cannot be entered with a partially built record.
//! Invariant predicates therefore only ever see records whose every field
//! coerced and satisfied its constraints.
//!
//! A run is a pure function of the schema and the payload: nothing is
//! cached between runs, and a shared schema may be validated against from
//! any number of threads at once.

use recval_core::{FieldPath, TypedValue, ValidatedRecord, ValidationError};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::coerce::CoercionError;
use crate::collector::ErrorCollector;
use crate::compose;
use crate::error::ValidationErrors;
use crate::schema::{Schema, UnknownFields};

/// Validate `payload` against `schema`.
///
/// On success returns the typed record, containing every declared field
/// that was present or defaulted. On failure returns every error found:
/// all field-level errors in declaration order, or, when every field
/// passed, every failing invariant in declaration order. The two never mix.
///
/// # Errors
///
/// Returns [`ValidationErrors`] (never empty) when the payload is rejected.
pub fn validate(schema: &Schema, payload: &Value) -> Result<ValidatedRecord, ValidationErrors> {
    match run(schema, payload) {
        Ok(record) => {
            debug!(schema = schema.name(), fields = record.len(), "payload accepted");
            Ok(record)
        }
        Err(errors) => {
            debug!(schema = schema.name(), errors = errors.len(), "payload rejected");
            Err(ValidationErrors::new(schema.name(), errors.into_errors()))
        }
    }
}

/// One run, with errors still relative to this record. Nested record
/// fields re-enter here.
pub(crate) fn run(schema: &Schema, payload: &Value) -> Result<ValidatedRecord, ErrorCollector> {
    CollectingFields::new(schema).collect(payload)?.check()
}

/// Field phase: coerce and constrain every declared field.
struct CollectingFields<'s> {
    schema: &'s Schema,
    errors: ErrorCollector,
}

/// Invariant phase: the record is complete and typed.
struct CheckingInvariants<'s> {
    schema: &'s Schema,
    record: ValidatedRecord,
}

impl<'s> CollectingFields<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            errors: ErrorCollector::new(),
        }
    }

    fn collect(mut self, payload: &Value) -> Result<CheckingInvariants<'s>, ErrorCollector> {
        let Some(map) = payload.as_object() else {
            self.errors.push(ValidationError::type_coercion(
                FieldPath::root(),
                CoercionError::NotMapping.to_string(),
            ));
            return Err(self.errors);
        };

        let mode = self.schema.config().coercion_mode();
        let mut fields: Vec<(String, TypedValue)> = Vec::with_capacity(self.schema.fields().len());
        for spec in self.schema.fields() {
            let raw = map.get(spec.name()).filter(|v| !v.is_null());
            let mut field_errors = ErrorCollector::new();
            if let Some(value) = compose::validate_field(spec, raw, mode, &mut field_errors) {
                fields.push((spec.name().to_string(), value));
            }
            if !field_errors.is_empty() {
                trace!(
                    schema = self.schema.name(),
                    field = spec.name(),
                    errors = field_errors.len(),
                    "field rejected"
                );
            }
            self.errors.absorb_under_field(spec.name(), field_errors);
        }

        if self.schema.config().unknown_fields == UnknownFields::Reject {
            self.reject_unknown(map);
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        Ok(CheckingInvariants {
            schema: self.schema,
            record: ValidatedRecord::from_fields(self.schema.name(), fields),
        })
    }

    fn reject_unknown(&mut self, map: &Map<String, Value>) {
        for key in map.keys() {
            if self.schema.field(key).is_none() {
                self.errors.push(ValidationError::constraint(
                    FieldPath::field(key.as_str()),
                    "Extra inputs are not permitted",
                ));
            }
        }
    }
}

impl CheckingInvariants<'_> {
    fn check(self) -> Result<ValidatedRecord, ErrorCollector> {
        let mut errors = ErrorCollector::new();
        for rule in self.schema.invariants() {
            if let Err(message) = rule.evaluate(&self.record) {
                trace!(schema = self.schema.name(), rule = rule.name(), "invariant failed");
                errors.push(ValidationError::invariant(
                    rule.path().clone(),
                    rule.name(),
                    format!("Value error, {message}"),
                ));
            }
        }
        if errors.is_empty() {
            Ok(self.record)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use crate::invariant::InvariantRule;
    use recval_core::ErrorKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn mission() -> Schema {
        Schema::builder("mission")
            .field(FieldSpec::string("mission_id"))
            .field(FieldSpec::integer("crew_size").minimum(1).maximum(20))
            .field(FieldSpec::boolean("active").default(false))
            .field(FieldSpec::string("notes").optional())
            .invariant(InvariantRule::ensure("id_prefix", "mission_id must start with \"M\"", |r| {
                r.get_str("mission_id").is_some_and(|id| id.starts_with('M'))
            }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_payload() {
        let record = validate(&mission(), &json!({"mission_id": "M1", "crew_size": "4"})).unwrap();
        assert_eq!(record.schema_name(), "mission");
        assert_eq!(record.get_i64("crew_size"), Some(4));
        assert_eq!(record.get_bool("active"), Some(false));
        assert!(!record.contains("notes"));
    }

    #[test]
    fn test_null_is_absent() {
        let err = validate(&mission(), &json!({"mission_id": null, "crew_size": 3})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind(), ErrorKind::MissingRequired);
        assert_eq!(err.errors()[0].path().to_string(), "mission_id");
    }

    #[test]
    fn test_field_errors_gate_invariants() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let schema = Schema::builder("gated")
            .field(FieldSpec::integer("a"))
            .field(FieldSpec::integer("b"))
            .invariant(InvariantRule::ensure("never", "always fails", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                false
            }))
            .build()
            .unwrap();

        let err = validate(&schema, &json!({"a": "x"})).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.iter().all(|e| e.kind().is_field_level()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let err = validate(&schema, &json!({"a": 1, "b": 2})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind(), ErrorKind::Invariant);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invariant_message_and_rule() {
        let err = validate(&mission(), &json!({"mission_id": "X1", "crew_size": 2})).unwrap_err();
        let e = &err.errors()[0];
        assert!(e.path().is_root());
        assert_eq!(e.rule(), Some("id_prefix"));
        assert_eq!(e.message(), "Value error, mission_id must start with \"M\"");
    }

    #[test]
    fn test_non_mapping_payload() {
        let err = validate(&mission(), &json!([1, 2])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind(), ErrorKind::TypeCoercion);
        assert!(err.errors()[0].path().is_root());
    }

    #[test]
    fn test_unknown_fields() {
        let payload = json!({"mission_id": "M1", "crew_size": 2, "captain": "Ada"});
        assert!(validate(&mission(), &payload).is_ok());

        let strict = Schema::builder("closed")
            .field(FieldSpec::string("mission_id"))
            .field(FieldSpec::integer("crew_size"))
            .unknown_fields(UnknownFields::Reject)
            .build()
            .unwrap();
        let err = validate(&strict, &payload).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].path().to_string(), "captain");
        assert_eq!(err.errors()[0].message(), "Extra inputs are not permitted");
    }

    #[test]
    fn test_epoch_seconds_beyond_year_9999_rejected() {
        let schema = Schema::builder("schedule")
            .field(FieldSpec::timestamp("at"))
            .build()
            .unwrap();
        for secs in [253_402_300_800i64, -62_200_000_000] {
            let err = validate(&schema, &json!({ "at": secs })).unwrap_err();
            assert_eq!(err.errors()[0].kind(), ErrorKind::TypeCoercion);
            assert_eq!(err.errors()[0].path().to_string(), "at");
        }

        let record = validate(&schema, &json!({ "at": 253_402_300_799i64 })).unwrap();
        assert_eq!(record.to_value(), json!({ "at": "9999-12-31T23:59:59Z" }));
        assert_eq!(validate(&schema, &record.to_value()), Ok(record));
    }

    #[test]
    fn test_strict_mode_refuses_cross_type() {
        let schema = Schema::builder("strict")
            .field(FieldSpec::integer("n"))
            .strict(true)
            .build()
            .unwrap();
        assert!(validate(&schema, &json!({"n": 3})).is_ok());
        let err = validate(&schema, &json!({"n": "3"})).unwrap_err();
        assert_eq!(err.errors()[0].kind(), ErrorKind::TypeCoercion);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::field::FieldSpec;
    use proptest::prelude::*;
    use serde_json::json;

    const TIMESTAMP_PATTERN: &str = concat!(
        "[+-]?[0-9]{4,5}-[01][0-9]-[0-3][0-9]",
        "T[0-2][0-9]:[0-5][0-9]:[0-5][0-9]",
        "(Z|[+-][01][0-9]:[0-5][0-9])?",
    );

    fn schedule() -> Schema {
        Schema::builder("schedule")
            .field(FieldSpec::timestamp("at"))
            .build()
            .unwrap()
    }

    fn assert_revalidates(schema: &Schema, payload: &Value) -> Result<(), TestCaseError> {
        if let Ok(record) = validate(schema, payload) {
            prop_assert_eq!(validate(schema, &record.to_value()), Ok(record));
        }
        Ok(())
    }

    proptest! {
        /// Epoch seconds either fail or yield a record that validates to itself.
        #[test]
        fn epoch_seconds_revalidate(secs in -70_000_000_000i64..=300_000_000_000) {
            assert_revalidates(&schedule(), &json!({ "at": secs }))?;
        }

        /// Timestamp strings, expanded years and offsets included, likewise.
        #[test]
        fn timestamp_strings_revalidate(s in TIMESTAMP_PATTERN) {
            assert_revalidates(&schedule(), &json!({ "at": s }))?;
        }
    }
}
