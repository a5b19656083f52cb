//! # Typed Values and Validated Records
//!
//! [`TypedValue`] is the output of coercion: one variant per semantic type
//! the engine knows. [`ValidatedRecord`] is the successful result of a
//! validation run: an ordered, immutable mapping from field name to typed
//! value. Records are built once by the engine and then only read.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::temporal::Timestamp;

/// A value that has passed coercion into a declared semantic type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// Finite 64-bit float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// UTF-8 string.
    String(String),
    /// UTC timestamp.
    Timestamp(Timestamp),
    /// A symbol from an enumerated set.
    Symbol(String),
    /// A nested, fully validated record.
    Record(ValidatedRecord),
    /// An ordered collection of typed values.
    List(Vec<TypedValue>),
}

impl TypedValue {
    /// Semantic type name, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Integer(_) => "integer",
            TypedValue::Float(_) => "float",
            TypedValue::Boolean(_) => "boolean",
            TypedValue::String(_) => "string",
            TypedValue::Timestamp(_) => "timestamp",
            TypedValue::Symbol(_) => "enum",
            TypedValue::Record(_) => "record",
            TypedValue::List(_) => "list",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: floats as-is, integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            TypedValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            TypedValue::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            TypedValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValidatedRecord> {
        match self {
            TypedValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render back to a raw JSON value that coerces to `self` again.
    pub fn to_value(&self) -> Value {
        match self {
            TypedValue::Integer(i) => Value::from(*i),
            TypedValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::String(s) | TypedValue::Symbol(s) => Value::String(s.clone()),
            TypedValue::Timestamp(ts) => Value::String(ts.to_iso8601()),
            TypedValue::Record(r) => r.to_value(),
            TypedValue::List(items) => {
                Value::Array(items.iter().map(TypedValue::to_value).collect())
            }
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(i) => write!(f, "{i}"),
            // Whole floats keep a trailing ".0" so they read as floats.
            TypedValue::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            TypedValue::Float(x) => write!(f, "{x}"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::String(s) | TypedValue::Symbol(s) => f.write_str(s),
            TypedValue::Timestamp(ts) => write!(f, "{ts}"),
            TypedValue::Record(r) => write!(f, "{r}"),
            TypedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// The successful output of a validation run.
///
/// Fields appear in schema declaration order. Optional fields that were
/// absent and have no default are omitted, so [`get`](Self::get) returns
/// `None` for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedRecord {
    schema: String,
    fields: Vec<(String, TypedValue)>,
}

impl ValidatedRecord {
    /// Assemble a record from already-validated fields.
    pub fn from_fields(schema: impl Into<String>, fields: Vec<(String, TypedValue)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this record was validated against.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(TypedValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_str)
    }

    pub fn get_symbol(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_symbol)
    }

    pub fn get_timestamp(&self, name: &str) -> Option<&Timestamp> {
        self.get(name).and_then(TypedValue::as_timestamp)
    }

    pub fn get_record(&self, name: &str) -> Option<&ValidatedRecord> {
        self.get(name).and_then(TypedValue::as_record)
    }

    /// Elements of a collection field; empty when absent or not a list.
    pub fn get_list(&self, name: &str) -> &[TypedValue] {
        self.get(name).and_then(TypedValue::as_list).unwrap_or(&[])
    }

    /// Records of a collection-of-records field, in order.
    pub fn records(&self, name: &str) -> impl Iterator<Item = &ValidatedRecord> {
        self.get_list(name).iter().filter_map(TypedValue::as_record)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a raw JSON object suitable for re-validation.
    pub fn to_value(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect::<serde_json::Map<String, Value>>();
        Value::Object(map)
    }
}

impl Serialize for ValidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}
