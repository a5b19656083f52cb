//! # recval-cli — Record Validation Command-Line Interface
//!
//! Validates JSON and YAML payload files against the built-in schema
//! catalog.
//!
//! ## Subcommands
//!
//! - `schemas` — list catalog schemas, their fields and invariants
//! - `validate` — validate payload files against one catalog schema
//! - `demo` — run the built-in accepted/rejected payload pairs
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from the handlers.
//! - Handlers write to a caller-supplied `Write`, so they are testable
//!   without a process boundary.
//! - All validation logic lives in `recval-schema`.

pub mod catalog;
pub mod demo;
pub mod payload;
pub mod report;
pub mod validate;
