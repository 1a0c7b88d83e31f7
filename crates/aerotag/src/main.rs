//! AeroTag unified CLI.
//!
//! Thin wrapper over the schema engine: everything interesting lives in
//! `aerotag_schema`. Commands here only wire up configuration, print
//! results and map outcomes to exit codes.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod cli;
mod corpus;

const DEFAULT_LOG_FILTER: &str = "aerotag=info,aerotag_schema=info";

#[derive(Parser, Debug)]
#[command(
    name = "aerotag",
    about = "Schema evolution and validation for aircraft community submissions"
)]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare the submission corpus against the latest schema and create
    /// the next version when new tags appeared
    Update(cli::update::UpdateArgs),

    /// Validate submission documents against a stored schema version
    Validate(cli::validate::ValidateArgs),

    /// Extract the JSON payload from an intake form body and validate it
    Intake(cli::intake::IntakeArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "aerotag=debug,aerotag_schema=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Update(args) => cli::update::run(args),
        Commands::Validate(args) => cli::validate::run(args),
        Commands::Intake(args) => cli::intake::run(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
