//! Report command implementation
//!
//! Renders persisted run metadata for audits and troubleshooting: a list
//! of historical runs, or the full detail of one run.

use super::shared::setup_logging;
use crate::app::models::telemetry::RunMetadata;
use crate::app::services::recorder::RunRecorder;
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::Config;
use crate::Result;
use colored::Colorize;
use tracing::info;

/// Report command runner
pub async fn run_report(args: ReportArgs) -> Result<()> {
    setup_logging(args.get_log_level())?;
    args.validate()?;

    let output_root = args
        .output_root
        .clone()
        .unwrap_or_else(|| Config::default().output.output_root);
    info!("Reading runs from {}", output_root.display());

    let recorder = RunRecorder::new(output_root);

    match &args.run_id {
        Some(run_id) => {
            let metadata = recorder.load_metadata(run_id)?;
            match args.output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&metadata)?);
                }
                OutputFormat::Human => print_run_report(&metadata, args.detailed),
            }
        }
        None => {
            let runs = recorder.list_runs()?;
            match args.output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&runs)?);
                }
                OutputFormat::Human => {
                    if runs.is_empty() {
                        println!(
                            "No runs found under {}",
                            recorder.output_root().display()
                        );
                    } else {
                        println!("{}", "Persisted runs".bold());
                        for run in runs {
                            println!("  {}", run);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Print a human-readable report for one run
fn print_run_report(metadata: &RunMetadata, detailed: bool) {
    println!("{}", metadata.run_id.bold());
    println!("  Started:            {}", metadata.started_at);
    match metadata.completed_at {
        Some(completed_at) => println!("  Completed:          {}", completed_at),
        None => println!("  Completed:          {}", "never (run did not finalize)".red()),
    }
    println!("  Records:            {}", metadata.total_records());
    println!(
        "  Enriched:           {} ({:.1}%)",
        metadata.total_successes(),
        metadata.success_rate()
    );
    println!("  Fallbacks:          {}", metadata.total_fallbacks);
    println!("  Duplicates removed: {}", metadata.duplicates_removed);
    println!(
        "  Imagery capture:    {}",
        if metadata.imagery_requested { "on" } else { "off" }
    );

    if detailed {
        println!();
        println!("  {}", "Batches".bold());
        for batch in &metadata.batches {
            println!(
                "    #{:<3} {:>3} records | {:>3} enriched | {:>3} fallbacks | {:>3} duplicates | {:.2?}",
                batch.batch_index,
                batch.record_count,
                batch.success_count,
                batch.fallback_count,
                batch.duplicate_count,
                batch.elapsed
            );
            for reason in &batch.failure_reasons {
                println!("         {} {}", "!".yellow(), reason);
            }
        }
    }
}
