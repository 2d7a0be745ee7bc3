//! Enrich command implementation
//!
//! The complete batch workflow: configuration loading, input reading,
//! pipeline execution, run-scoped persistence, and the operator summary.

use super::shared::{load_configuration, read_listings, setup_logging};
use crate::app::models::RawStationRecord;
use crate::app::services::lookup::HttpLookupClient;
use crate::app::services::orchestrator::{BatchOrchestrator, EnrichmentRun, deduplicate_records};
use crate::app::services::recorder::{RunArtifacts, RunRecorder};
use crate::cli::args::{EnrichArgs, OutputFormat};
use crate::config::Config;
use crate::Result;
use colored::Colorize;
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Enrich command runner
///
/// Orchestrates the entire enrichment workflow:
/// 1. Set up logging and configuration
/// 2. Read and validate the input listings
/// 3. Run the rate-limited pipeline over the record set
/// 4. Persist the run and print the summary
pub async fn run_enrich(args: EnrichArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level())?;

    info!("Starting station enricher");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let records = read_listings(&args.input_path)?;
    info!(
        "Loaded {} listings from {}",
        records.len(),
        args.input_path.display()
    );

    if args.dry_run {
        return run_dry_run(&config, records);
    }

    let provider = Arc::new(HttpLookupClient::new(&config.lookup)?);
    let orchestrator = BatchOrchestrator::new(&config, provider);

    let run = orchestrator.run(records, args.show_progress()).await;

    let recorder = RunRecorder::new(config.output.output_root.clone());
    let artifacts = recorder.persist(&run)?;

    print_summary(&args, &run, &artifacts, start_time.elapsed());

    Ok(())
}

/// Show the dedup and chunk plan without lookups or writes
fn run_dry_run(config: &Config, records: Vec<RawStationRecord>) -> Result<()> {
    info!("Performing dry run - no lookups will be issued");

    let input_count = records.len();
    let (survivors, duplicates_removed) = deduplicate_records(records);
    let chunk_count = survivors.len().div_ceil(config.batch.chunk_size);

    println!("{}", "Dry run - enrichment plan".bold());
    println!("  Input listings:     {}", input_count);
    println!("  Duplicates removed: {}", duplicates_removed);
    println!("  Records to enrich:  {}", survivors.len());
    println!(
        "  Chunks:             {} (up to {} records each)",
        chunk_count, config.batch.chunk_size
    );
    println!(
        "  Request interval:   {}ms, {} attempts per lookup",
        config.lookup.request_interval_ms, config.lookup.max_attempts
    );
    println!(
        "  Imagery capture:    {}",
        if config.batch.capture_imagery { "on" } else { "off" }
    );

    Ok(())
}

/// Print the end-of-run summary in the requested format
fn print_summary(
    args: &EnrichArgs,
    run: &EnrichmentRun,
    artifacts: &RunArtifacts,
    elapsed: std::time::Duration,
) {
    match args.output_format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "run_id": run.metadata.run_id,
                "records": run.record_count(),
                "enriched": run.metadata.total_successes(),
                "fallbacks": run.metadata.total_fallbacks,
                "duplicates_removed": run.metadata.duplicates_removed,
                "batches": run.metadata.batches.len(),
                "elapsed_secs": elapsed.as_secs_f64(),
                "run_dir": artifacts.run_dir,
            });
            println!("{}", summary);
        }
        OutputFormat::Human => {
            if args.quiet {
                return;
            }
            println!();
            println!("{}", "Enrichment run complete".green().bold());
            println!("  Run:                {}", run.metadata.run_id);
            println!("  Records:            {}", run.record_count());
            println!(
                "  Enriched:           {}",
                run.metadata.total_successes().to_string().green()
            );
            println!(
                "  Fallbacks:          {}",
                run.metadata.total_fallbacks.to_string().yellow()
            );
            println!("  Duplicates removed: {}", run.metadata.duplicates_removed);
            println!("  Elapsed:            {}", HumanDuration(elapsed));
            println!("  Artifacts:          {}", artifacts.run_dir.display());
        }
    }
}
