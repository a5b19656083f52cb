//! # recval CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use recval_cli::catalog::Catalog;
use recval_cli::{demo, report, validate};

/// recval — declarative record validation.
///
/// Validates JSON/YAML payloads against typed schemas with coercion,
/// per-field constraints, nested records and cross-field invariants.
#[derive(Parser, Debug)]
#[command(name = "recval", version, about)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "RECVAL_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List catalog schemas.
    Schemas,
    /// Validate payload files against a catalog schema.
    Validate(validate::ValidateArgs),
    /// Run the demonstration payloads.
    Demo,
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let catalog = Catalog::load().context("building schema catalog")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Commands::Schemas => {
            write!(out, "{}", report::CatalogListing(&catalog))?;
            ExitCode::SUCCESS
        }
        Commands::Validate(args) => {
            if validate::run_validate(&args, &catalog, &mut out)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Demo => {
            demo::run_demo(&catalog, &mut out)?;
            ExitCode::SUCCESS
        }
    };
    out.flush()?;
    Ok(code)
}
