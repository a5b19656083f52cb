//! # recval-schema — Declarative Record Validation
//!
//! Validates loosely-typed payloads (`serde_json::Value`) against an
//! explicit [`Schema`] and produces either a [`ValidatedRecord`] or the
//! complete, ordered list of failures.
//!
//! ## Pipeline
//!
//! - [`coerce`] — the Type Coercer: raw scalar → [`TypedValue`].
//! - [`constraint`] — the Field Constraint Evaluator: bounds, lengths,
//!   membership. Every constraint is checked; nothing short-circuits.
//! - `compose` — the Schema Composer: nested records and collections,
//!   re-pathing child errors as `field.sub` / `field[i]`.
//! - [`validate`] — the Record Validator: a two-phase run where the field
//!   phase gates the invariant phase.
//! - [`collector`] — the Error Collector: an append-only ordered list.
//!
//! ## Schema Construction
//!
//! Schemas are built once through [`SchemaBuilder`]. A malformed schema
//! (duplicate field, bound of the wrong type, uncoercible default) is a
//! [`SchemaError`] at build time; there is no way to obtain a `Schema`
//! value that would validate incorrectly.
//!
//! ## Crate Policy
//!
//! - Depends only on `recval-core` internally.
//! - Validation is a pure function of `(schema, payload)`: no I/O, no
//!   shared mutable state. `Schema` is `Send + Sync`.
//! - Validation failures are data ([`ValidationErrors`]), never panics.
//!
//! [`ValidatedRecord`]: recval_core::ValidatedRecord
//! [`TypedValue`]: recval_core::TypedValue

pub mod coerce;
pub mod collector;
mod compose;
pub mod constraint;
pub mod error;
pub mod field;
pub mod invariant;
pub mod schema;
pub mod validate;

pub use coerce::{coerce, CoercionError, CoercionMode, ScalarType};
pub use collector::ErrorCollector;
pub use constraint::{Bound, Constraint, Subject, Violation};
pub use error::{SchemaError, ValidationErrors};
pub use field::{FieldSpec, FieldType};
pub use invariant::InvariantRule;
pub use schema::{Schema, SchemaBuilder, SchemaConfig, UnknownFields};
pub use validate::validate;
