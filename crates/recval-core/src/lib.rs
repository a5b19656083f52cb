//! # recval-core — Foundational Types for recval
//!
//! This crate defines the data that flows in and out of the validation
//! engine. The engine itself lives in `recval-schema`; everything here is
//! plain data with no knowledge of schemas.
//!
//! ## Key Design Principles
//!
//! 1. **Typed output, loose input.** Payloads arrive as `serde_json::Value`.
//!    What leaves the engine is a [`ValidatedRecord`] whose values are
//!    [`TypedValue`]s — never raw JSON.
//!
//! 2. **Structured failures.** Every failure is a [`ValidationError`] with a
//!    [`FieldPath`], an [`ErrorKind`] and a message. Errors are immutable;
//!    re-pathing produces a new error.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] normalizes every accepted
//!    ISO-8601 form to UTC.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `recval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{CoreError, ErrorKind, ValidationError};
pub use path::{FieldPath, PathSegment};
pub use temporal::Timestamp;
pub use value::{TypedValue, ValidatedRecord};
