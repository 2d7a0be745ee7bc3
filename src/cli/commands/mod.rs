//! Command implementations for the station enricher CLI
//!
//! This module contains the main command execution logic, progress
//! reporting, and error handling for the CLI interface. Each command is
//! implemented in its own module:
//! - `enrich`: the batch enrichment workflow with run-scoped persistence
//! - `report`: inspection of persisted run metadata

pub mod enrich;
pub mod report;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for the station enricher
///
/// Dispatches to the appropriate subcommand handler based on CLI args.
pub async fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Commands::Enrich(enrich_args) => enrich::run_enrich(enrich_args).await,
        Commands::Report(report_args) => report::run_report(report_args).await,
    }
}
