//! Command-line argument definitions for the station enricher
//!
//! This module defines the complete CLI interface using the clap derive
//! API: the `enrich` command that runs the pipeline and the `report`
//! command that inspects persisted runs.

use crate::constants::MAX_CHUNK_SIZE;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the station enricher
///
/// Enriches scraped Jamaican petrol station listings with geographic and
/// business metadata from a place-search provider, producing a run-scoped
/// audit report alongside the enriched records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "station-enricher",
    version,
    about = "Enrich scraped petrol station listings with place metadata",
    long_about = "Batch tool that augments scraped Jamaican petrol station listings with \
                  standardized coordinates, contact details, opening hours, and ratings from \
                  an external place-search provider. Lookups are globally rate limited, \
                  failures degrade individual records instead of aborting the run, and every \
                  run persists an auditable metadata report."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the station enricher
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the enrichment pipeline over a listings file
    Enrich(EnrichArgs),
    /// Inspect persisted run metadata
    Report(ReportArgs),
}

/// Arguments for the enrich command (main pipeline run)
#[derive(Debug, Clone, Parser)]
pub struct EnrichArgs {
    /// Input listings file
    ///
    /// A JSON array of raw station records, as produced by the upstream
    /// listing scrape. Records need a name; address and listing payload
    /// are optional.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "Input listings file (JSON array of raw station records)"
    )]
    pub input_path: PathBuf,

    /// Output root for run artifacts
    ///
    /// Each run writes its metadata and enriched records into a fresh
    /// run-scoped directory under this root. If not specified, defaults
    /// to the user data directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output root for run-scoped artifact directories"
    )]
    pub output_root: Option<PathBuf>,

    /// Records per chunk
    ///
    /// Chunks bound how much rate-limit budget a single unit of work can
    /// consume and scope the per-batch telemetry.
    #[arg(
        long = "chunk-size",
        value_name = "COUNT",
        help = "Records per chunk (1-25)"
    )]
    pub chunk_size: Option<usize>,

    /// Minimum delay between provider requests, in milliseconds
    #[arg(
        long = "request-interval-ms",
        value_name = "MS",
        help = "Minimum delay between outbound provider requests"
    )]
    pub request_interval_ms: Option<u64>,

    /// Maximum lookup attempts per record
    #[arg(
        long = "max-attempts",
        value_name = "COUNT",
        help = "Maximum lookup attempts per record (initial attempt + retries)"
    )]
    pub max_attempts: Option<usize>,

    /// Capture thumbnail imagery references for this run
    #[arg(
        long = "capture-imagery",
        help = "Capture thumbnail imagery references for this run"
    )]
    pub capture_imagery: bool,

    /// Provider API key
    ///
    /// Overrides both the config file and the PLACES_API_KEY environment
    /// variable.
    #[arg(long = "api-key", value_name = "KEY", help = "Provider API key")]
    pub api_key: Option<String>,

    /// Path to configuration file
    ///
    /// TOML configuration file for advanced settings. If not specified,
    /// looks for ~/.config/station-enricher/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Perform a dry run without lookups or writes
    ///
    /// Shows the dedup and chunk plan for the input without contacting
    /// the provider or creating any output.
    #[arg(
        long = "dry-run",
        help = "Show the dedup and chunk plan without lookups or writes"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the report command (run metadata inspection)
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Output root holding persisted runs
    ///
    /// If not specified, uses the same default as the enrich command.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output root holding persisted runs"
    )]
    pub output_root: Option<PathBuf>,

    /// Run identifier to report on
    ///
    /// If not specified, lists all persisted runs instead.
    #[arg(long = "run-id", value_name = "ID", help = "Run identifier to report on")]
    pub run_id: Option<String>,

    /// Include per-batch detail in the report
    #[arg(long = "detailed", help = "Include per-batch detail in the report")]
    pub detailed: bool,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the report"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, ValueEnum, PartialEq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl EnrichArgs {
    /// Validate the enrich command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input_path.display()
            )));
        }

        if !self.input_path.is_file() {
            return Err(Error::configuration(format!(
                "Input path is not a file: {}",
                self.input_path.display()
            )));
        }

        if let Some(chunk_size) = self.chunk_size {
            if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
                return Err(Error::configuration(format!(
                    "Chunk size must be between 1 and {}",
                    MAX_CHUNK_SIZE
                )));
            }
        }

        if self.request_interval_ms == Some(0) {
            return Err(Error::configuration(
                "Request interval must be greater than 0 ms".to_string(),
            ));
        }

        if self.max_attempts == Some(0) {
            return Err(Error::configuration(
                "Maximum lookup attempts must be greater than 0".to_string(),
            ));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ReportArgs {
    /// Validate the report command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(output_root) = &self.output_root {
            if output_root.exists() && !output_root.is_dir() {
                return Err(Error::configuration(format!(
                    "Output root is not a directory: {}",
                    output_root.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for EnrichArgs {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("listings.json"),
            output_root: None,
            chunk_size: None,
            request_interval_ms: None,
            max_attempts: None,
            capture_imagery: false,
            api_key: None,
            config_file: None,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}
