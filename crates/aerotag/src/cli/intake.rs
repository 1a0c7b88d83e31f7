//! Intake command - extract a submission payload from an intake form body.

use std::path::PathBuf;
use std::process::ExitCode;

use aerotag_schema::{intake, validate, SchemaStore};
use anyhow::{Context, Result};
use clap::Args;

use crate::cli::StoreArgs;

/// Arguments for the `intake` command
#[derive(Debug, Args)]
pub struct IntakeArgs {
    /// File holding the intake form body text
    pub body: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Only print the extracted payload, skip validation
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: IntakeArgs) -> Result<ExitCode> {
    let body = std::fs::read_to_string(&args.body)
        .with_context(|| format!("Failed to read {}", args.body.display()))?;

    let Some(payload) = intake::extract_submission_json(&body) else {
        eprintln!("No submission JSON found in {}", args.body.display());
        return Ok(ExitCode::FAILURE);
    };

    if let Some(contributor) = intake::extract_contributor_name(&body) {
        println!("Contributor: {contributor}");
    }
    println!("{payload}");

    if args.no_validate {
        return Ok(ExitCode::SUCCESS);
    }

    let store = SchemaStore::new(&args.store.schema_dir);
    let schema = store.load_latest()?;
    let (_, errors) = validate::parse_and_validate(&payload, &schema)?;
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    for error in &errors {
        eprintln!("{error}");
    }
    Ok(ExitCode::FAILURE)
}
