//! Run-wide record deduplication
//!
//! Scraped listings routinely repeat stations with case and spacing
//! variations. Deduplication keys on the normalized name (lowercase,
//! whitespace-collapsed); the first occurrence wins and later duplicates
//! are counted against it.

use crate::app::models::RawStationRecord;
use crate::constants::normalized_name;
use std::collections::HashMap;
use tracing::{debug, info};

/// A surviving record and the duplicates it absorbed
///
/// The absorbed count lets the chunk that ends up holding the survivor
/// report those duplicates in its telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupedRecord {
    /// The first occurrence of this station in the input
    pub record: RawStationRecord,
    /// How many later input records collapsed into this one
    pub duplicates_absorbed: usize,
}

/// Deduplicate raw records by normalized station name
///
/// Input order is preserved for survivors; only the first occurrence of
/// each name proceeds through enrichment.
///
/// # Arguments
///
/// * `records` - Raw input records, in scrape order
///
/// # Returns
///
/// Tuple of (surviving records with absorbed counts, duplicates removed)
pub fn deduplicate_records(records: Vec<RawStationRecord>) -> (Vec<DedupedRecord>, usize) {
    let mut survivor_index: HashMap<String, usize> = HashMap::new();
    let mut survivors: Vec<DedupedRecord> = Vec::new();
    let mut duplicates_removed = 0;

    for record in records {
        let key = normalized_name(&record.name);
        match survivor_index.get(&key) {
            Some(&index) => {
                survivors[index].duplicates_absorbed += 1;
                duplicates_removed += 1;
                debug!(
                    "Dropping duplicate listing '{}' (matches '{}')",
                    record.name, survivors[index].record.name
                );
            }
            None => {
                survivor_index.insert(key, survivors.len());
                survivors.push(DedupedRecord {
                    record,
                    duplicates_absorbed: 0,
                });
            }
        }
    }

    info!(
        "Deduplication complete: removed {} duplicates, {} records remaining",
        duplicates_removed,
        survivors.len()
    );

    (survivors, duplicates_removed)
}
