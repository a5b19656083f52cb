//! # Validate Subcommand
//!
//! `recval validate --schema <name> <FILE>...`: validate each payload file
//! against one catalog schema and report every outcome.

use std::io::Write;
use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::catalog::Catalog;
use crate::payload::load_payload;
use crate::report::{render_json, OutputFormat, TextReport};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Catalog schema to validate against (see `recval schemas`).
    #[arg(long, short)]
    pub schema: String,

    /// Payload files (.json, .yaml, .yml).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "RECVAL_FORMAT")]
    pub format: OutputFormat,
}

/// Validate every file and write one report per file to `out`.
///
/// Returns `Ok(true)` when every payload is valid. Unreadable files and an
/// unknown schema name are errors; invalid payloads are not.
pub fn run_validate(
    args: &ValidateArgs,
    catalog: &Catalog,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let Some(schema) = catalog.get(&args.schema) else {
        bail!(
            "unknown schema '{}' (available: {})",
            args.schema,
            catalog.names().join(", ")
        );
    };

    let mut failed = 0usize;
    for path in &args.files {
        let payload = load_payload(path)?;
        let outcome = schema.validate(&payload);
        if outcome.is_err() {
            failed += 1;
        }
        let source = path.display().to_string();
        match args.format {
            OutputFormat::Text => write!(out, "{}", TextReport::new(&source, &outcome))?,
            OutputFormat::Json => writeln!(out, "{}", render_json(&source, &outcome))?,
        }
    }

    info!(
        schema = schema.name(),
        files = args.files.len(),
        failed,
        "validation finished"
    );
    Ok(failed == 0)
}
