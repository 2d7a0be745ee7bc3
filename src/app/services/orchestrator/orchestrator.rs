//! Main batch orchestrator implementation and run loop
//!
//! The orchestrator owns every piece of shared state for a run: the
//! rate-limited lookup client (and with it the global request clock), the
//! parser, the working record set, and the in-progress run metadata. It
//! drives chunks strictly in order and records within a chunk strictly in
//! order, so runs over the same input are reproducible and debuggable.

use crate::app::models::telemetry::{BatchTelemetry, RunMetadata};
use crate::app::models::{EnrichedStationRecord, RawStationRecord};
use crate::app::services::lookup::{LookupClient, PlaceLookup, RateLimiter, RetryPolicy};
use crate::app::services::merger::{EnrichmentFailure, merge_enriched, merge_fallback};
use crate::app::services::orchestrator::deduplication::{DedupedRecord, deduplicate_records};
use crate::app::services::query_builder::build_search_query;
use crate::app::services::response_parser::ResponseParser;
use crate::config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Complete output of one enrichment run
#[derive(Debug)]
pub struct EnrichmentRun {
    /// One terminal record per deduplicated input record, in input order
    pub records: Vec<EnrichedStationRecord>,
    /// Finalized audit metadata for the run
    pub metadata: RunMetadata,
}

impl EnrichmentRun {
    /// Number of output records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// One-line summary for logging and operator output
    pub fn summary(&self) -> String {
        self.metadata.summary()
    }
}

/// Batch orchestrator for station enrichment
///
/// Consumes itself on [`BatchOrchestrator::run`]: one orchestrator, one
/// run, one `RunMetadata`. The lookup client's rate-limit clock lives
/// inside and is therefore global across the whole run, not per chunk.
pub struct BatchOrchestrator {
    lookup: LookupClient,
    parser: ResponseParser,
    chunk_size: usize,
    capture_imagery: bool,
}

impl BatchOrchestrator {
    /// Create an orchestrator from configuration and a provider
    ///
    /// # Arguments
    ///
    /// * `config` - Validated run configuration
    /// * `provider` - Place-search provider the lookup client will drive
    pub fn new(config: &Config, provider: Arc<dyn PlaceLookup>) -> Self {
        let limiter = RateLimiter::from_millis(config.lookup.request_interval_ms);
        let retry = RetryPolicy::from_config(&config.lookup);

        Self {
            lookup: LookupClient::new(provider, limiter, retry),
            parser: ResponseParser::new(config.batch.bounds, config.batch.capture_imagery),
            // A zero chunk size would never drain the run loop
            chunk_size: config.batch.chunk_size.max(1),
            capture_imagery: config.batch.capture_imagery,
        }
    }

    /// Run the full pipeline over a record set
    ///
    /// Every input record reaches exactly one terminal output record;
    /// per-record failures degrade to fallbacks and never abort the run.
    ///
    /// # Arguments
    ///
    /// * `records` - Raw input records, in scrape order
    /// * `show_progress` - Whether to render a progress bar
    ///
    /// # Returns
    ///
    /// The enriched record list plus finalized run metadata
    pub async fn run(mut self, records: Vec<RawStationRecord>, show_progress: bool) -> EnrichmentRun {
        let mut metadata = RunMetadata::new(self.capture_imagery);

        info!(
            "Starting enrichment run {} for {} input records",
            metadata.run_id,
            records.len()
        );

        let (survivors, duplicates_removed) = deduplicate_records(records);
        metadata.duplicates_removed = duplicates_removed;

        let progress_bar = if show_progress {
            Some(Self::create_run_progress_bar(
                survivors.len() as u64,
                "Enriching stations",
            ))
        } else {
            None
        };

        let total_chunks = survivors.len().div_ceil(self.chunk_size);
        let mut enriched_records = Vec::with_capacity(survivors.len());

        let mut chunks = survivors.into_iter().peekable();
        let mut batch_index = 0;
        while chunks.peek().is_some() {
            let chunk: Vec<DedupedRecord> = chunks.by_ref().take(self.chunk_size).collect();

            let telemetry = self
                .process_chunk(batch_index, chunk, &mut enriched_records, progress_bar.as_ref())
                .await;

            info!(
                "Batch {} of {} complete: {} records, {} enriched, {} fallbacks",
                batch_index + 1,
                total_chunks,
                telemetry.record_count,
                telemetry.success_count,
                telemetry.fallback_count
            );

            metadata.record_batch(telemetry);
            batch_index += 1;
        }

        metadata.finalize();

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!(
                "Enrichment complete: {} records",
                enriched_records.len()
            ));
        }

        info!("{}", metadata.summary());

        EnrichmentRun {
            records: enriched_records,
            metadata,
        }
    }

    /// Process one chunk of records, in order, and build its telemetry
    async fn process_chunk(
        &mut self,
        batch_index: usize,
        chunk: Vec<DedupedRecord>,
        output: &mut Vec<EnrichedStationRecord>,
        progress_bar: Option<&ProgressBar>,
    ) -> BatchTelemetry {
        let started = Instant::now();
        let record_count = chunk.len();
        let mut success_count = 0;
        let mut fallback_count = 0;
        let mut duplicate_count = 0;
        let mut failure_reasons = Vec::new();

        for entry in chunk {
            duplicate_count += entry.duplicates_absorbed;

            let record = self.process_record(entry.record).await;
            if record.is_fallback() {
                fallback_count += 1;
                if let Some(reason) = &record.failure_reason {
                    failure_reasons.push(reason.clone());
                }
            } else {
                success_count += 1;
            }
            output.push(record);

            if let Some(pb) = progress_bar {
                pb.inc(1);
            }
        }

        BatchTelemetry {
            batch_index,
            record_count,
            success_count,
            fallback_count,
            duplicate_count,
            elapsed: started.elapsed(),
            failure_reasons,
        }
    }

    /// Drive one record through query build, lookup, parse, and merge
    ///
    /// Always returns a terminal record; failures degrade to fallback.
    async fn process_record(&mut self, raw: RawStationRecord) -> EnrichedStationRecord {
        let query = build_search_query(&raw);
        debug!("Enriching '{}' with query '{}'", raw.name, query);

        let payload = match self.lookup.lookup(&query).await {
            Ok(payload) => payload,
            Err(err) => {
                let failure = EnrichmentFailure::from(err);
                debug!("Lookup failed for '{}': {}", raw.name, failure);
                return merge_fallback(raw, &failure);
            }
        };

        match self.parser.parse(&payload) {
            Ok(result) => merge_enriched(raw, result),
            Err(err) => {
                let failure = EnrichmentFailure::from(err);
                debug!("Parse failed for '{}': {}", raw.name, failure);
                merge_fallback(raw, &failure)
            }
        }
    }

    /// Create a progress bar for the record stream
    fn create_run_progress_bar(total: u64, operation: &str) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(operation.to_string());
        pb
    }
}
