//! # Field Constraint Evaluator
//!
//! Declarative per-field rules and their evaluation. Every declared
//! constraint is checked independently and in declaration order, so a
//! value that breaks two rules reports two violations.
//!
//! Bounds are inclusive. Length bounds count string characters (Unicode
//! scalar values) or collection elements.

use std::fmt;

use recval_core::TypedValue;
use serde_json::Value;

use crate::coerce::{coerce, describe_choices, CoercionMode, ScalarType};

/// A numeric bound. Integer bounds apply to integer and float fields;
/// float bounds apply to float fields only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Integer(i64),
    Float(f64),
}

impl Bound {
    pub fn as_f64(&self) -> f64 {
        match self {
            Bound::Integer(i) => *i as f64,
            Bound::Float(f) => *f,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Bound::Float(f) if f.is_nan())
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Integer(v)
    }
}

impl From<i32> for Bound {
    fn from(v: i32) -> Self {
        Bound::Integer(i64::from(v))
    }
}

impl From<u32> for Bound {
    fn from(v: u32) -> Self {
        Bound::Integer(i64::from(v))
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Float(v)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Integer(i) => write!(f, "{i}"),
            Bound::Float(x) => write!(f, "{x}"),
        }
    }
}

/// A declared per-field rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `value >= bound` (numeric fields).
    Minimum(Bound),
    /// `value <= bound` (numeric fields).
    Maximum(Bound),
    /// At least this many characters or elements.
    MinLength(usize),
    /// At most this many characters or elements.
    MaxLength(usize),
    /// Value must equal one of these raw values after coercion to the
    /// field's type (scalar fields).
    OneOf(Vec<Value>),
}

impl Constraint {
    /// Tag name, for schema errors.
    pub fn tag(&self) -> &'static str {
        match self {
            Constraint::Minimum(_) => "minimum",
            Constraint::Maximum(_) => "maximum",
            Constraint::MinLength(_) => "min-length",
            Constraint::MaxLength(_) => "max-length",
            Constraint::OneOf(_) => "one-of",
        }
    }

    /// Whether this constraint counts characters or elements.
    pub fn is_length(&self) -> bool {
        matches!(self, Constraint::MinLength(_) | Constraint::MaxLength(_))
    }
}

/// What a constraint is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A coerced scalar value.
    Scalar(&'a TypedValue),
    /// The element count of a collection, checked before its elements.
    Items(usize),
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation<'c> {
    pub constraint: &'c Constraint,
    pub message: String,
}

/// Evaluate every constraint against `subject`, in declaration order.
///
/// `scalar` is the field's scalar type, used to coerce `one-of` members
/// for comparison; it is `None` for collection fields.
pub fn evaluate<'c>(
    subject: Subject<'_>,
    constraints: &'c [Constraint],
    scalar: Option<ScalarType<'_>>,
) -> Vec<Violation<'c>> {
    constraints
        .iter()
        .filter_map(|constraint| {
            check(subject, constraint, scalar).map(|message| Violation { constraint, message })
        })
        .collect()
}

fn check(
    subject: Subject<'_>,
    constraint: &Constraint,
    scalar: Option<ScalarType<'_>>,
) -> Option<String> {
    match (constraint, subject) {
        (Constraint::Minimum(bound), Subject::Scalar(value)) => {
            (compare(value, bound)? == std::cmp::Ordering::Less)
                .then(|| format!("Input should be greater than or equal to {bound}"))
        }
        (Constraint::Maximum(bound), Subject::Scalar(value)) => {
            (compare(value, bound)? == std::cmp::Ordering::Greater)
                .then(|| format!("Input should be less than or equal to {bound}"))
        }
        (Constraint::MinLength(min), Subject::Scalar(TypedValue::String(s))) => {
            let len = s.chars().count();
            (len < *min).then(|| {
                format!("String should have at least {min} {}", plural(*min, "character"))
            })
        }
        (Constraint::MaxLength(max), Subject::Scalar(TypedValue::String(s))) => {
            let len = s.chars().count();
            (len > *max).then(|| {
                format!("String should have at most {max} {}", plural(*max, "character"))
            })
        }
        (Constraint::MinLength(min), Subject::Items(len)) => (len < *min).then(|| {
            format!(
                "List should have at least {min} {} after validation, not {len}",
                plural(*min, "item")
            )
        }),
        (Constraint::MaxLength(max), Subject::Items(len)) => (len > *max).then(|| {
            format!(
                "List should have at most {max} {} after validation, not {len}",
                plural(*max, "item")
            )
        }),
        (Constraint::OneOf(members), Subject::Scalar(value)) => {
            let target = scalar?;
            let found = members
                .iter()
                .any(|m| coerce(m, target, CoercionMode::Lax).is_ok_and(|typed| &typed == value));
            (!found).then(|| format!("Input should be {}", describe_members(members)))
        }
        // Pairings rejected when the schema is built.
        _ => None,
    }
}

fn compare(value: &TypedValue, bound: &Bound) -> Option<std::cmp::Ordering> {
    match (value, bound) {
        (TypedValue::Integer(v), Bound::Integer(b)) => Some(v.cmp(b)),
        (TypedValue::Integer(v), Bound::Float(b)) => (*v as f64).partial_cmp(b),
        (TypedValue::Float(v), b) => v.partial_cmp(&b.as_f64()),
        _ => None,
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn describe_members(members: &[Value]) -> String {
    let rendered: Vec<String> = members
        .iter()
        .map(|m| match m {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    describe_choices(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(
        subject: Subject<'_>,
        constraints: &[Constraint],
        scalar: Option<ScalarType<'_>>,
    ) -> Vec<String> {
        evaluate(subject, constraints, scalar)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_inclusive_numeric_bounds() {
        let rules = [
            Constraint::Minimum(Bound::Integer(1)),
            Constraint::Maximum(Bound::Integer(20)),
        ];
        for ok in [1, 10, 20] {
            let value = TypedValue::Integer(ok);
            assert!(
                evaluate(Subject::Scalar(&value), &rules, Some(ScalarType::Integer)).is_empty()
            );
        }
        assert_eq!(
            messages(Subject::Scalar(&TypedValue::Integer(99)), &rules, Some(ScalarType::Integer)),
            vec!["Input should be less than or equal to 20"]
        );
        assert_eq!(
            messages(Subject::Scalar(&TypedValue::Integer(0)), &rules, Some(ScalarType::Integer)),
            vec!["Input should be greater than or equal to 1"]
        );
    }

    #[test]
    fn test_float_value_with_integer_bound() {
        let rules = [
            Constraint::Minimum(Bound::Integer(0)),
            Constraint::Maximum(Bound::Float(10.0)),
        ];
        let value = TypedValue::Float(10.0);
        assert!(evaluate(Subject::Scalar(&value), &rules, Some(ScalarType::Float)).is_empty());
        assert_eq!(
            messages(Subject::Scalar(&TypedValue::Float(-0.5)), &rules, Some(ScalarType::Float)),
            vec!["Input should be greater than or equal to 0"]
        );
    }

    #[test]
    fn test_all_constraints_reported() {
        // Contradictory on purpose: a single value breaks both.
        let rules = [Constraint::MinLength(5), Constraint::OneOf(vec![json!("ab"), json!("cd")])];
        let value = TypedValue::String("xyz".into());
        assert_eq!(
            messages(Subject::Scalar(&value), &rules, Some(ScalarType::String)),
            vec!["String should have at least 5 characters", "Input should be 'ab' or 'cd'"]
        );
    }

    #[test]
    fn test_string_length_counts_chars() {
        let rules = [Constraint::MaxLength(3)];
        let value = TypedValue::String("éèê".into());
        assert!(evaluate(Subject::Scalar(&value), &rules, Some(ScalarType::String)).is_empty());
        let value = TypedValue::String("abcd".into());
        assert_eq!(
            messages(Subject::Scalar(&value), &rules, Some(ScalarType::String)),
            vec!["String should have at most 3 characters"]
        );
    }

    #[test]
    fn test_singular_units() {
        let rules = [Constraint::MinLength(1)];
        assert_eq!(
            messages(
                Subject::Scalar(&TypedValue::String(String::new())),
                &rules,
                Some(ScalarType::String)
            ),
            vec!["String should have at least 1 character"]
        );
        assert_eq!(
            messages(Subject::Items(0), &rules, None),
            vec!["List should have at least 1 item after validation, not 0"]
        );
    }

    #[test]
    fn test_item_counts() {
        let rules = [Constraint::MinLength(1), Constraint::MaxLength(12)];
        assert!(evaluate(Subject::Items(12), &rules, None).is_empty());
        assert_eq!(
            messages(Subject::Items(13), &rules, None),
            vec!["List should have at most 12 items after validation, not 13"]
        );
    }

    #[test]
    fn test_one_of_coerces_members() {
        let rules = [Constraint::OneOf(vec![json!(1), json!(2), json!(3)])];
        let value = TypedValue::Integer(2);
        assert!(
            evaluate(Subject::Scalar(&value), &rules, Some(ScalarType::Integer)).is_empty()
        );
        assert_eq!(
            messages(Subject::Scalar(&TypedValue::Integer(4)), &rules, Some(ScalarType::Integer)),
            vec!["Input should be '1', '2' or '3'"]
        );
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(Bound::from(20).to_string(), "20");
        assert_eq!(Bound::from(7.5).to_string(), "7.5");
        assert!(Bound::Float(f64::NAN).is_nan());
        assert!(!Bound::Integer(0).is_nan());
    }
}
