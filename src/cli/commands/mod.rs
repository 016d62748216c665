//! Command implementations for the wra-config CLI
//!
//! Each command is implemented in its own module and owns its document for the
//! duration of the run. Documents are written only after every check a command
//! performs has passed.

pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod inspect;
pub mod shared;
pub mod validate;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner for wra-config
///
/// Dispatches to the appropriate subcommand handler:
/// - `init`: create a document skeleton
/// - `import`: CSV header inference and point merge
/// - `inspect`: dry inference report for a CSV file
/// - `edit`: bulk point edits and removal
/// - `validate`: both validation tiers, no output file
/// - `export`: validation-gated export
pub async fn run(args: Args) -> Result<CommandStats> {
    let command = args
        .command
        .ok_or_else(|| Error::configuration("No command given"))?;

    match command {
        Commands::Init(init_args) => init::run_init(init_args).await,
        Commands::Import(import_args) => import::run_import(import_args).await,
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args).await,
        Commands::Edit(edit_args) => edit::run_edit(edit_args).await,
        Commands::Validate(validate_args) => validate::run_validate(validate_args).await,
        Commands::Export(export_args) => export::run_export(export_args).await,
    }
}
