//! # Type Coercer
//!
//! Converts one raw JSON scalar into a [`TypedValue`] of a target
//! [`ScalarType`]. Pure function of `(value, target, mode)`.
//!
//! ## Lax Mode (default)
//!
//! | Target    | Accepted input |
//! |-----------|----------------|
//! | integer   | JSON integer in `i64` range; whole JSON float; string `[+-]?digits` |
//! | float     | any JSON number; numeric-literal string; result must be finite |
//! | boolean   | JSON bool; integer `0`/`1`; `true false 1 0 yes no on off t f y n` (any case) |
//! | string    | JSON string |
//! | timestamp | ISO-8601 string (see [`Timestamp::parse`]); JSON integer as Unix epoch seconds |
//! | enum      | JSON string equal to one declared symbol (case-sensitive) |
//!
//! ## Strict Mode
//!
//! Scalars must already carry the target JSON type: integers for integer
//! fields, numbers for float fields, booleans for boolean fields, strings
//! for string, enum and timestamp fields.

use std::num::IntErrorKind;

use recval_core::{CoreError, Timestamp, TypedValue};
use serde_json::Value;
use thiserror::Error;

/// Literals accepted for `true` in lax mode, compared case-insensitively.
const TRUE_LITERALS: [&str; 6] = ["true", "1", "yes", "on", "t", "y"];
/// Literals accepted for `false` in lax mode, compared case-insensitively.
const FALSE_LITERALS: [&str; 6] = ["false", "0", "no", "off", "f", "n"];

/// How permissive coercion is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoercionMode {
    /// Accept cross-type conversions from the table above.
    #[default]
    Lax,
    /// Accept only inputs already of the target JSON type.
    Strict,
}

/// The scalar targets the coercer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType<'a> {
    Integer,
    Float,
    Boolean,
    String,
    Timestamp,
    Enum(&'a [String]),
}

/// Why a raw value could not be coerced. The `Display` text is the
/// user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("Input should be a valid integer")]
    NotInteger,

    #[error("Input should be a valid integer, unable to parse string as an integer")]
    IntegerParse,

    #[error("Input should be a valid integer, got a number with a fractional part")]
    FractionalInteger,

    #[error("Input should be a valid integer, value does not fit in a 64-bit signed integer")]
    IntegerOverflow,

    #[error("Input should be a valid number")]
    NotNumber,

    #[error("Input should be a valid number, unable to parse string as a number")]
    FloatParse,

    #[error("Input should be a finite number")]
    NonFinite,

    #[error("Input should be a valid boolean")]
    NotBoolean,

    #[error("Input should be a valid boolean, unable to interpret input")]
    BooleanParse,

    #[error("Input should be a valid string")]
    NotString,

    #[error("Input should be a valid datetime")]
    NotTimestamp,

    #[error("Input should be a valid datetime, {0}")]
    InvalidTimestamp(String),

    #[error("Input should be {}", describe_choices(.0))]
    UnknownSymbol(Vec<String>),

    #[error("Input should be a valid dictionary")]
    NotMapping,

    #[error("Input should be a valid list")]
    NotSequence,
}

/// Render choices as `'a', 'b' or 'c'`.
pub(crate) fn describe_choices(choices: &[String]) -> String {
    let quoted: Vec<String> = choices.iter().map(|c| format!("'{c}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Coerce `raw` into `target`.
pub fn coerce(
    raw: &Value,
    target: ScalarType<'_>,
    mode: CoercionMode,
) -> Result<TypedValue, CoercionError> {
    match target {
        ScalarType::Integer => coerce_integer(raw, mode).map(TypedValue::Integer),
        ScalarType::Float => coerce_float(raw, mode).map(TypedValue::Float),
        ScalarType::Boolean => coerce_bool(raw, mode).map(TypedValue::Boolean),
        ScalarType::String => match raw {
            Value::String(s) => Ok(TypedValue::String(s.clone())),
            _ => Err(CoercionError::NotString),
        },
        ScalarType::Timestamp => coerce_timestamp(raw, mode).map(TypedValue::Timestamp),
        ScalarType::Enum(symbols) => match raw {
            Value::String(s) if symbols.iter().any(|sym| sym == s) => {
                Ok(TypedValue::Symbol(s.clone()))
            }
            _ => Err(CoercionError::UnknownSymbol(symbols.to_vec())),
        },
    }
}

fn coerce_integer(raw: &Value, mode: CoercionMode) -> Result<i64, CoercionError> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Err(CoercionError::IntegerOverflow);
            }
            if mode == CoercionMode::Strict {
                return Err(CoercionError::NotInteger);
            }
            let f = n.as_f64().ok_or(CoercionError::NotInteger)?;
            if f.fract() != 0.0 {
                return Err(CoercionError::FractionalInteger);
            }
            // i64::MAX is not representable as f64; 2^63 is the first value out of range.
            if f < -9_223_372_036_854_775_808.0 || f >= 9_223_372_036_854_775_808.0 {
                return Err(CoercionError::IntegerOverflow);
            }
            Ok(f as i64)
        }
        Value::String(s) if mode == CoercionMode::Lax => parse_integer_literal(s),
        _ => Err(CoercionError::NotInteger),
    }
}

fn parse_integer_literal(s: &str) -> Result<i64, CoercionError> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        if is_float_literal(s) {
            return Err(CoercionError::FractionalInteger);
        }
        return Err(CoercionError::IntegerParse);
    }
    s.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CoercionError::IntegerOverflow,
        _ => CoercionError::IntegerParse,
    })
}

/// Standard decimal float literal: sign, digits with optional fraction,
/// optional exponent. Rejects `inf`, `nan`, hex and digit separators.
fn is_float_literal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = !(int_part.is_empty() && frac_part.is_empty())
        && all_digits(int_part)
        && all_digits(frac_part);
    let exponent_ok = match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
    };
    mantissa_ok && exponent_ok
}

fn coerce_float(raw: &Value, mode: CoercionMode) -> Result<f64, CoercionError> {
    let f = match raw {
        Value::Number(n) => n.as_f64().ok_or(CoercionError::NotNumber)?,
        Value::String(s) if mode == CoercionMode::Lax => {
            if !is_float_literal(s) {
                return Err(CoercionError::FloatParse);
            }
            s.parse::<f64>().map_err(|_| CoercionError::FloatParse)?
        }
        _ => return Err(CoercionError::NotNumber),
    };
    if !f.is_finite() {
        return Err(CoercionError::NonFinite);
    }
    Ok(f)
}

fn coerce_bool(raw: &Value, mode: CoercionMode) -> Result<bool, CoercionError> {
    match (raw, mode) {
        (Value::Bool(b), _) => Ok(*b),
        (Value::Number(n), CoercionMode::Lax) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(CoercionError::BooleanParse),
        },
        (Value::String(s), CoercionMode::Lax) => {
            let lowered = s.to_ascii_lowercase();
            if TRUE_LITERALS.contains(&lowered.as_str()) {
                Ok(true)
            } else if FALSE_LITERALS.contains(&lowered.as_str()) {
                Ok(false)
            } else {
                Err(CoercionError::BooleanParse)
            }
        }
        _ => Err(CoercionError::NotBoolean),
    }
}

fn coerce_timestamp(raw: &Value, mode: CoercionMode) -> Result<Timestamp, CoercionError> {
    let map_err = |e: CoreError| match e {
        CoreError::InvalidTimestamp { reason, .. } => CoercionError::InvalidTimestamp(reason),
        other => CoercionError::InvalidTimestamp(other.to_string()),
    };
    match raw {
        Value::String(s) => Timestamp::parse(s).map_err(map_err),
        Value::Number(n) if mode == CoercionMode::Lax => match n.as_i64() {
            Some(secs) => Timestamp::from_epoch_secs(secs).map_err(map_err),
            None => Err(CoercionError::NotTimestamp),
        },
        _ => Err(CoercionError::NotTimestamp),
    }
}
