//! Update command - evolve the schema from the submission corpus.

use std::path::PathBuf;
use std::process::ExitCode;

use aerotag_schema::evolve::{self, EvolutionOutcome, EvolutionPlan};
use aerotag_schema::{SchemaStore, TagRegistry};
use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use crate::cli::StoreArgs;
use crate::corpus::DirCorpus;

/// Arguments for the `update` command
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Directory holding the submission corpus
    #[arg(long, env = "AEROTAG_SUBMISSIONS_DIR", default_value = "submissions")]
    pub submissions_dir: PathBuf,

    /// Only check whether an update is needed, without writing (exit 1 if so)
    #[arg(long)]
    pub check: bool,
}

pub fn run(args: UpdateArgs) -> Result<ExitCode> {
    let submissions = DirCorpus::new(&args.submissions_dir)
        .read_all()
        .with_context(|| {
            format!(
                "Failed to read submissions from {}",
                args.submissions_dir.display()
            )
        })?;

    let registry = TagRegistry::build(&submissions);
    for conflict in registry.conflicts() {
        warn!("{conflict}");
    }

    let store = SchemaStore::new(&args.store.schema_dir);

    if args.check {
        return match evolve::plan(&store, &registry)? {
            EvolutionPlan::UpToDate { version } => {
                println!("Schema is up to date (v{version})");
                Ok(ExitCode::SUCCESS)
            }
            EvolutionPlan::UpdateNeeded {
                next_version,
                new_tags,
            } => {
                println!(
                    "Schema update needed -> v{next_version}. New tags: {}",
                    new_tags.join(", ")
                );
                Ok(ExitCode::FAILURE)
            }
        };
    }

    match evolve::apply(&store, &registry)? {
        EvolutionOutcome::UpToDate { version } => {
            println!("No update needed (v{version})");
        }
        EvolutionOutcome::Written { path, new_tags, .. } => {
            println!("Created {}", path.display());
            println!("Added tags: {}", new_tags.join(", "));
        }
    }
    Ok(ExitCode::SUCCESS)
}
