//! # Field Specifications
//!
//! A [`FieldSpec`] declares one field: its name, semantic type, whether it
//! is required, an optional default, and its constraints. Specs are built
//! by value with chained methods:
//!
//! ```
//! use recval_schema::FieldSpec;
//!
//! let crew_size = FieldSpec::integer("crew_size").minimum(1).maximum(20);
//! let notes = FieldSpec::string("notes").optional().max_length(200);
//! # let _ = (crew_size, notes);
//! ```
//!
//! Specs are checked when their schema is built; see
//! [`SchemaBuilder::build`](crate::SchemaBuilder::build).

use std::sync::Arc;

use serde_json::Value;

use crate::coerce::ScalarType;
use crate::constraint::{Bound, Constraint};
use crate::schema::Schema;

/// The semantic type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Integer,
    Float,
    Boolean,
    String,
    Timestamp,
    /// One of a fixed, case-sensitive set of symbols.
    Enum { symbols: Vec<String> },
    /// A nested record validated against its own schema.
    Record { schema: Arc<Schema> },
    /// An ordered collection whose elements follow `element`.
    List { element: Box<FieldSpec> },
}

impl FieldType {
    /// Type name, for messages and schema errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::String => "string",
            FieldType::Timestamp => "timestamp",
            FieldType::Enum { .. } => "enum",
            FieldType::Record { .. } => "record",
            FieldType::List { .. } => "list",
        }
    }

    /// The coercion target for scalar types; `None` for records and lists.
    pub fn as_scalar(&self) -> Option<ScalarType<'_>> {
        match self {
            FieldType::Integer => Some(ScalarType::Integer),
            FieldType::Float => Some(ScalarType::Float),
            FieldType::Boolean => Some(ScalarType::Boolean),
            FieldType::String => Some(ScalarType::String),
            FieldType::Timestamp => Some(ScalarType::Timestamp),
            FieldType::Enum { symbols } => Some(ScalarType::Enum(symbols)),
            FieldType::Record { .. } | FieldType::List { .. } => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    required: bool,
    default: Option<Value>,
    constraints: Vec<Constraint>,
    description: Option<String>,
}

impl FieldSpec {
    /// A required field of the given type with no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    /// An enum field over `symbols`, in declaration order.
    pub fn enumeration<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols = symbols.into_iter().map(Into::into).collect();
        Self::new(name, FieldType::Enum { symbols })
    }

    /// A nested record field.
    pub fn record(name: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(
            name,
            FieldType::Record {
                schema: schema.into(),
            },
        )
    }

    /// A collection field. The element spec's name is only used in schema
    /// errors; its `required` flag is ignored.
    pub fn list(name: impl Into<String>, element: FieldSpec) -> Self {
        Self::new(
            name,
            FieldType::List {
                element: Box::new(element),
            },
        )
    }

    /// Mark the field optional: absence is not an error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Substitute `value` when the field is absent. Implies optional.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn minimum(self, bound: impl Into<Bound>) -> Self {
        self.constraint(Constraint::Minimum(bound.into()))
    }

    pub fn maximum(self, bound: impl Into<Bound>) -> Self {
        self.constraint(Constraint::Maximum(bound.into()))
    }

    pub fn min_length(self, len: usize) -> Self {
        self.constraint(Constraint::MinLength(len))
    }

    pub fn max_length(self, len: usize) -> Self {
        self.constraint(Constraint::MaxLength(len))
    }

    /// Minimum element count of a collection field.
    pub fn min_items(self, count: usize) -> Self {
        self.min_length(count)
    }

    /// Maximum element count of a collection field.
    pub fn max_items(self, count: usize) -> Self {
        self.max_length(count)
    }

    pub fn one_of<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.constraint(Constraint::OneOf(values.into_iter().map(Into::into).collect()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// One-line summary for listings, e.g. `integer, required, minimum 1, maximum 20`.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.type_label()];
        if self.required {
            parts.push("required".to_string());
        } else if let Some(default) = &self.default {
            parts.push(format!("default {default}"));
        } else {
            parts.push("optional".to_string());
        }
        parts.extend(self.constraint_labels());
        parts.join(", ")
    }

    fn type_label(&self) -> String {
        match &self.field_type {
            FieldType::Enum { symbols } => format!("enum {{{}}}", symbols.join(", ")),
            FieldType::Record { schema } => format!("record {}", schema.name()),
            FieldType::List { element } => {
                let inner = element.constraint_labels();
                if inner.is_empty() {
                    format!("list of {}", element.type_label())
                } else {
                    format!("list of ({}, {})", element.type_label(), inner.join(", "))
                }
            }
            other => other.type_name().to_string(),
        }
    }

    fn constraint_labels(&self) -> Vec<String> {
        self.constraints
            .iter()
            .map(|c| match c {
                Constraint::Minimum(b) => format!("minimum {b}"),
                Constraint::Maximum(b) => format!("maximum {b}"),
                Constraint::MinLength(n) => format!("min-length {n}"),
                Constraint::MaxLength(n) => format!("max-length {n}"),
                Constraint::OneOf(values) => {
                    let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                    format!("one-of [{}]", rendered.join(", "))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_required() {
        let spec = FieldSpec::string("name");
        assert!(spec.is_required());
        assert!(spec.default_value().is_none());
        assert!(spec.constraints().is_empty());
    }

    #[test]
    fn test_default_implies_optional() {
        let spec = FieldSpec::boolean("is_operational").default(true);
        assert!(!spec.is_required());
        assert_eq!(spec.default_value(), Some(&json!(true)));
    }

    #[test]
    fn test_constraints_keep_declaration_order() {
        let spec = FieldSpec::integer("crew_size").minimum(1).maximum(20);
        assert_eq!(
            spec.constraints(),
            &[Constraint::Minimum(Bound::Integer(1)), Constraint::Maximum(Bound::Integer(20))]
        );
    }

    #[test]
    fn test_items_alias_length() {
        let spec = FieldSpec::list("tags", FieldSpec::string("tag")).min_items(1).max_items(3);
        assert_eq!(spec.constraints(), &[Constraint::MinLength(1), Constraint::MaxLength(3)]);
        assert_eq!(spec.field_type().type_name(), "list");
        assert!(spec.field_type().as_scalar().is_none());
    }

    #[test]
    fn test_summary() {
        let spec = FieldSpec::integer("crew_size").minimum(1).maximum(20);
        assert_eq!(spec.summary(), "integer, required, minimum 1, maximum 20");
        let spec = FieldSpec::enumeration("rank", ["cadet", "captain"]).default("cadet");
        assert_eq!(spec.summary(), "enum {cadet, captain}, default \"cadet\"");
        let spec = FieldSpec::list("tags", FieldSpec::string("tag").max_length(8)).optional();
        assert_eq!(spec.summary(), "list of (string, max-length 8), optional");
    }
}
