//! Data models for run telemetry and audit reporting
//!
//! This module contains the structures persisted after every enrichment
//! run: per-chunk counters and the run-level metadata artifact consumed
//! by operational tooling.

use crate::constants::{RUN_ID_PREFIX, RUN_ID_TIME_FORMAT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Batch Telemetry
// =============================================================================

/// Counters for a single processed chunk
///
/// Created once per chunk and never modified after the chunk completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTelemetry {
    /// Zero-based position of this chunk within the run
    pub batch_index: usize,

    /// Number of records processed in this chunk
    pub record_count: usize,

    /// Records that enriched successfully
    pub success_count: usize,

    /// Records that degraded to fallback
    pub fallback_count: usize,

    /// Duplicates absorbed by survivors that landed in this chunk
    pub duplicate_count: usize,

    /// Wall-clock time spent processing this chunk
    pub elapsed: Duration,

    /// Failure reason for every fallback in this chunk
    pub failure_reasons: Vec<String>,
}

// =============================================================================
// Run Metadata
// =============================================================================

/// Audit artifact summarizing one enrichment run
///
/// Created at run start, appended to per batch, finalized once at run
/// end. One per orchestrator invocation; persisted under a run-scoped
/// location so prior runs stay inspectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Run identifier derived from the start time
    pub run_id: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished; set by [`RunMetadata::finalize`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Telemetry for every processed chunk, in order
    pub batches: Vec<BatchTelemetry>,

    /// Duplicates removed by run-wide name deduplication
    pub duplicates_removed: usize,

    /// Total records that degraded to fallback
    pub total_fallbacks: usize,

    /// Whether imagery capture was requested for this run
    pub imagery_requested: bool,
}

impl RunMetadata {
    /// Start metadata for a new run, deriving the run id from the clock
    pub fn new(imagery_requested: bool) -> Self {
        let started_at = Utc::now();
        let run_id = format!(
            "{}{}",
            RUN_ID_PREFIX,
            started_at.format(RUN_ID_TIME_FORMAT)
        );
        Self {
            run_id,
            started_at,
            completed_at: None,
            batches: Vec::new(),
            duplicates_removed: 0,
            total_fallbacks: 0,
            imagery_requested,
        }
    }

    /// Append a completed chunk's telemetry
    pub fn record_batch(&mut self, batch: BatchTelemetry) {
        self.total_fallbacks += batch.fallback_count;
        self.batches.push(batch);
    }

    /// Finalize the run: stamp the end time
    pub fn finalize(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Total records processed across all chunks
    pub fn total_records(&self) -> usize {
        self.batches.iter().map(|b| b.record_count).sum()
    }

    /// Total records that enriched successfully
    pub fn total_successes(&self) -> usize {
        self.batches.iter().map(|b| b.success_count).sum()
    }

    /// Total wall-clock time spent in chunk processing
    pub fn total_elapsed(&self) -> Duration {
        self.batches.iter().map(|b| b.elapsed).sum()
    }

    /// Success rate across the run, as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            100.0
        } else {
            (self.total_successes() as f64 / total as f64) * 100.0
        }
    }

    /// One-line summary for logging and operator output
    pub fn summary(&self) -> String {
        format!(
            "Run {}: {} records in {} batches ({:.1}% enriched) | \
             Fallbacks: {} | Duplicates removed: {}",
            self.run_id,
            self.total_records(),
            self.batches.len(),
            self.success_rate(),
            self.total_fallbacks,
            self.duplicates_removed
        )
    }
}
