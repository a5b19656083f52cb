//! # Reporting
//!
//! Text and JSON renderings of validation outcomes and of the catalog.

use std::fmt;

use clap::ValueEnum;
use recval_core::ValidatedRecord;
use recval_schema::ValidationErrors;
use serde_json::{json, Value};

use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Text report for one payload: `OK` with the record's fields, or `FAIL`
/// with every error.
pub struct TextReport<'a> {
    source: &'a str,
    outcome: &'a Result<ValidatedRecord, ValidationErrors>,
}

impl<'a> TextReport<'a> {
    pub fn new(source: &'a str, outcome: &'a Result<ValidatedRecord, ValidationErrors>) -> Self {
        Self { source, outcome }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Ok(record) => {
                writeln!(f, "OK   {}: valid {}", self.source, record.schema_name())?;
                for (name, value) in record.iter() {
                    writeln!(f, "  {name}: {value}")?;
                }
                Ok(())
            }
            Err(errors) => writeln!(f, "FAIL {}: {errors}", self.source),
        }
    }
}

/// `{"source", "valid": true, "record"}` or `{"source", "valid": false, "errors"}`.
pub fn render_json(source: &str, outcome: &Result<ValidatedRecord, ValidationErrors>) -> Value {
    match outcome {
        Ok(record) => json!({
            "source": source,
            "valid": true,
            "schema": record.schema_name(),
            "record": record.to_value(),
        }),
        Err(errors) => json!({
            "source": source,
            "valid": false,
            "schema": errors.schema_name(),
            "errors": errors.errors(),
        }),
    }
}

/// Listing for the `schemas` subcommand.
pub struct CatalogListing<'a>(pub &'a Catalog);

impl fmt::Display for CatalogListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for schema in self.0.iter() {
            match schema.description() {
                Some(description) => writeln!(f, "{} - {description}", schema.name())?,
                None => writeln!(f, "{}", schema.name())?,
            }
            for field in schema.fields() {
                writeln!(f, "  {}: {}", field.name(), field.summary())?;
            }
            for rule in schema.invariants() {
                if rule.path().is_root() {
                    writeln!(f, "  invariant {}", rule.name())?;
                } else {
                    writeln!(f, "  invariant {} (at {})", rule.name(), rule.path())?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recval_schema::{FieldSpec, Schema};

    fn schema() -> Schema {
        Schema::builder("station")
            .field(FieldSpec::integer("crew_size").minimum(1).maximum(20))
            .build()
            .unwrap()
    }

    #[test]
    fn test_text_valid() {
        let outcome = schema().validate(&json!({"crew_size": "6"}));
        let text = TextReport::new("a.json", &outcome).to_string();
        assert_eq!(text, "OK   a.json: valid station\n  crew_size: 6\n");
    }

    #[test]
    fn test_text_invalid() {
        let outcome = schema().validate(&json!({"crew_size": 99}));
        let text = TextReport::new("b.json", &outcome).to_string();
        assert!(text.starts_with("FAIL b.json: "));
        assert!(text.contains("crew_size: Input should be less than or equal to 20 [constraint]"));
    }

    #[test]
    fn test_json_invalid() {
        let outcome = schema().validate(&json!({}));
        let value = render_json("c.json", &outcome);
        assert_eq!(value["valid"], json!(false));
        assert_eq!(
            value["errors"],
            json!([{"path": "crew_size", "kind": "missing-required", "message": "Field required"}])
        );
    }

    #[test]
    fn test_json_valid() {
        let outcome = schema().validate(&json!({"crew_size": 3}));
        let value = render_json("d.json", &outcome);
        assert_eq!(value["valid"], json!(true));
        assert_eq!(value["record"], json!({"crew_size": 3}));
    }

    #[test]
    fn test_catalog_listing() {
        let catalog = Catalog::load().unwrap();
        let listing = CatalogListing(&catalog).to_string();
        assert!(listing.contains("space_station - Space station telemetry snapshot"));
        assert!(listing.contains("  crew_size: integer, required, minimum 1, maximum 20"));
        assert!(listing.contains("  invariant command_present (at crew)"));
        assert!(listing.contains("  invariant physical_contact_verified\n"));
    }
}
