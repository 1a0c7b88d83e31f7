//! CLI command modules.

pub mod intake;
pub mod update;
pub mod validate;

use clap::Args;
use std::path::PathBuf;

/// Schema store location, shared by every command.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Directory holding the versioned schema documents
    #[arg(long, env = "AEROTAG_SCHEMA_DIR", default_value = "schemas")]
    pub schema_dir: PathBuf,
}
