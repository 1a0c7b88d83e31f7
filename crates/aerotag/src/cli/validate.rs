//! Validate command - check submission documents against a schema version.

use std::path::PathBuf;
use std::process::ExitCode;

use aerotag_schema::{validate, SchemaStore};
use anyhow::{Context, Result};
use clap::Args;

use crate::cli::StoreArgs;

/// Arguments for the `validate` command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Submission files to validate (a file may hold one document or an array)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Schema version to validate against (default: latest)
    #[arg(long)]
    pub schema_version: Option<u32>,
}

pub fn run(args: ValidateArgs) -> Result<ExitCode> {
    let store = SchemaStore::new(&args.store.schema_dir);
    let version = match args.schema_version {
        Some(version) => version,
        None => store.latest_version()?,
    };
    let schema = store.load(version)?;

    let mut failed = false;
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let (_, errors) = validate::parse_and_validate(&text, &schema)?;
        if errors.is_empty() {
            println!("{}: OK (v{version})", path.display());
        } else {
            failed = true;
            println!(
                "{}: {} error(s) against v{version}",
                path.display(),
                errors.len()
            );
            for error in &errors {
                println!("  {error}");
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
