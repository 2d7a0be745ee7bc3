//! Batch orchestration for enrichment runs
//!
//! This module drives the complete pipeline for a run: run-wide
//! deduplication, chunking, per-record enrichment through the query
//! builder, lookup client, parser, and merger, and per-chunk telemetry
//! collection.
//!
//! # Architecture
//!
//! - [`orchestrator`] - Main `BatchOrchestrator` struct and run loop
//! - [`deduplication`] - Normalized-name deduplication rules
//!
//! # Processing Pipeline
//!
//! 1. **Deduplication**: duplicates by normalized name are removed before
//!    chunking; only the first occurrence proceeds
//! 2. **Chunking**: the deduplicated set is partitioned into fixed-size
//!    chunks to bound rate-limit budget per unit of work
//! 3. **Enrichment**: chunks in order, records within a chunk in order;
//!    every record reaches a terminal state (enriched or fallback)
//! 4. **Telemetry**: one `BatchTelemetry` entry per chunk, aggregated
//!    into the run's `RunMetadata`
//!
//! Retry never happens at this level; it belongs entirely to the lookup
//! client.

pub mod deduplication;
pub mod orchestrator;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use deduplication::{DedupedRecord, deduplicate_records};
pub use orchestrator::{BatchOrchestrator, EnrichmentRun};
