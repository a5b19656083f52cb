//! # Schemas
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s plus an ordered list
//! of [`InvariantRule`]s, built once through [`SchemaBuilder`] and then
//! shared read-only. Nested record fields hold their sub-schema in an
//! `Arc`, so one schema can be referenced from many parents.
//!
//! ## Build-Time Checks
//!
//! [`SchemaBuilder::build`] rejects, with a [`SchemaError`]:
//!
//! - duplicate or unrenderable field names;
//! - numeric bounds on non-numeric fields, float bounds on integer fields,
//!   length bounds on anything but strings and collections, `one-of`
//!   members that do not coerce to the field's type;
//! - NaN bounds, `minimum > maximum`, `min-length > max-length`, empty
//!   `one-of` sets, empty or repeated enum symbols;
//! - defaults that do not coerce to the field's type;
//! - duplicate invariant names and invariant paths that do not start at a
//!   declared field.

use std::collections::HashSet;

use recval_core::{ErrorKind, ValidatedRecord};
use serde_json::Value;
use tracing::debug;

use crate::coerce::{coerce, CoercionMode};
use crate::collector::ErrorCollector;
use crate::compose;
use crate::constraint::{Bound, Constraint};
use crate::error::{SchemaError, ValidationErrors};
use crate::field::{FieldSpec, FieldType};
use crate::invariant::InvariantRule;

/// What to do with payload keys no field declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Drop them silently.
    #[default]
    Ignore,
    /// Report each one as a `constraint` error at its key.
    Reject,
}

/// Per-schema validation settings, fixed at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Disable cross-type coercion for this schema's own fields.
    pub strict: bool,
    pub unknown_fields: UnknownFields,
}

impl SchemaConfig {
    pub fn coercion_mode(&self) -> CoercionMode {
        if self.strict {
            CoercionMode::Strict
        } else {
            CoercionMode::Lax
        }
    }
}

/// An immutable, validated schema.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    invariants: Vec<InvariantRule>,
    config: SchemaConfig,
}

impl Schema {
    /// Start building a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            invariants: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Invariant rules in declaration order.
    pub fn invariants(&self) -> &[InvariantRule] {
        &self.invariants
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Validate `payload` against this schema. See [`crate::validate()`].
    pub fn validate(&self, payload: &Value) -> Result<ValidatedRecord, ValidationErrors> {
        crate::validate::validate(self, payload)
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    invariants: Vec<InvariantRule>,
    config: SchemaConfig,
}

impl SchemaBuilder {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field. Declaration order is validation and report order.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Append a cross-field rule. Rules run in declaration order.
    pub fn invariant(mut self, rule: InvariantRule) -> Self {
        self.invariants.push(rule);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.config.unknown_fields = policy;
        self
    }

    /// Check every declaration and produce the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in declaration order.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mode = self.config.coercion_mode();

        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !is_renderable_name(spec.name()) {
                return Err(SchemaError::InvalidFieldName {
                    schema: self.name.clone(),
                    field: spec.name().to_string(),
                });
            }
            if !seen.insert(spec.name()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: spec.name().to_string(),
                });
            }
            check_field(spec, mode)?;
        }

        let mut rule_names = HashSet::new();
        for rule in &self.invariants {
            if !rule_names.insert(rule.name()) {
                return Err(SchemaError::DuplicateInvariant {
                    schema: self.name.clone(),
                    rule: rule.name().to_string(),
                });
            }
            let targets_declared_field = match rule.path().head_field() {
                Some(head) => seen.contains(head),
                None => rule.path().is_root(),
            };
            if !targets_declared_field {
                return Err(SchemaError::UnknownInvariantPath {
                    schema: self.name.clone(),
                    rule: rule.name().to_string(),
                    path: rule.path().to_string(),
                });
            }
        }

        debug!(
            schema = %self.name,
            fields = self.fields.len(),
            invariants = self.invariants.len(),
            strict = self.config.strict,
            "schema built"
        );

        Ok(Schema {
            name: self.name,
            description: self.description,
            fields: self.fields,
            invariants: self.invariants,
            config: self.config,
        })
    }
}

fn is_renderable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '[', ']'])
}

fn check_field(spec: &FieldSpec, mode: CoercionMode) -> Result<(), SchemaError> {
    let field = spec.name();
    let field_type = spec.field_type();

    match field_type {
        FieldType::Enum { symbols } => check_symbols(field, symbols)?,
        FieldType::List { element } => check_field(element, mode)?,
        _ => {}
    }

    let mut minimum: Option<Bound> = None;
    let mut maximum: Option<Bound> = None;
    let mut min_length: Option<usize> = None;
    let mut max_length: Option<usize> = None;

    for constraint in spec.constraints() {
        let mismatch = || SchemaError::BoundTypeMismatch {
            field: field.to_string(),
            constraint: constraint.tag().to_string(),
            field_type: field_type.type_name().to_string(),
        };
        match constraint {
            Constraint::Minimum(bound) | Constraint::Maximum(bound) => {
                let float_on_integer =
                    matches!((field_type, bound), (FieldType::Integer, Bound::Float(_)));
                if !field_type.is_numeric() || float_on_integer {
                    return Err(mismatch());
                }
                if bound.is_nan() {
                    return Err(SchemaError::InvalidBound {
                        field: field.to_string(),
                        reason: format!("{} bound is NaN", constraint.tag()),
                    });
                }
                if matches!(constraint, Constraint::Minimum(_)) {
                    minimum = Some(*bound);
                } else {
                    maximum = Some(*bound);
                }
            }
            Constraint::MinLength(n) | Constraint::MaxLength(n) => {
                if !matches!(field_type, FieldType::String | FieldType::List { .. }) {
                    return Err(mismatch());
                }
                if matches!(constraint, Constraint::MinLength(_)) {
                    min_length = Some(*n);
                } else {
                    max_length = Some(*n);
                }
            }
            Constraint::OneOf(members) => {
                let target = field_type.as_scalar().ok_or_else(mismatch)?;
                if members.is_empty() {
                    return Err(SchemaError::InvalidBound {
                        field: field.to_string(),
                        reason: "one-of declares no values".to_string(),
                    });
                }
                for member in members {
                    coerce(member, target, mode).map_err(|_| mismatch())?;
                }
            }
        }
    }

    if let (Some(lo), Some(hi)) = (minimum, maximum) {
        if lo.as_f64() > hi.as_f64() {
            return Err(SchemaError::InvalidBound {
                field: field.to_string(),
                reason: format!("minimum {lo} exceeds maximum {hi}"),
            });
        }
    }
    if let (Some(lo), Some(hi)) = (min_length, max_length) {
        if lo > hi {
            return Err(SchemaError::InvalidBound {
                field: field.to_string(),
                reason: format!("min-length {lo} exceeds max-length {hi}"),
            });
        }
    }

    if let Some(default) = spec.default_value() {
        check_default(spec, default, mode)?;
    }
    Ok(())
}

fn check_symbols(field: &str, symbols: &[String]) -> Result<(), SchemaError> {
    if symbols.is_empty() {
        return Err(SchemaError::InvalidSymbols {
            field: field.to_string(),
            reason: "enum declares no symbols".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for symbol in symbols {
        if !seen.insert(symbol.as_str()) {
            return Err(SchemaError::InvalidSymbols {
                field: field.to_string(),
                reason: format!("enum symbol '{symbol}' declared more than once"),
            });
        }
    }
    Ok(())
}

/// A default must survive coercion. Constraint violations by a default
/// are left to validation time, where they are reported like any other.
fn check_default(spec: &FieldSpec, default: &Value, mode: CoercionMode) -> Result<(), SchemaError> {
    let mut errors = ErrorCollector::new();
    compose::validate_value(spec, default, mode, &mut errors);
    let failure = errors
        .errors()
        .iter()
        .find(|e| matches!(e.kind(), ErrorKind::TypeCoercion | ErrorKind::MissingRequired));
    match failure {
        None => Ok(()),
        Some(e) => Err(SchemaError::InvalidDefault {
            field: spec.name().to_string(),
            field_type: spec.field_type().type_name().to_string(),
            reason: if e.path().is_root() {
                e.message().to_string()
            } else {
                format!("{}: {}", e.path(), e.message())
            },
        }),
    }
}
