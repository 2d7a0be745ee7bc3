//! Search query construction for provider lookups
//!
//! Turns one raw station record into the normalized query string sent to
//! the place-search provider. Pure string work: no I/O, no failure modes.

use crate::app::models::RawStationRecord;
use crate::constants::{SEARCH_REGION_NAME, collapse_whitespace};

/// Build the provider search query for a raw station record
///
/// Name and address are trimmed and internally whitespace-collapsed, an
/// empty address is dropped, and the region name is always appended so a
/// name-only query stays scoped to the island.
///
/// # Arguments
///
/// * `record` - Raw listing to build the query from
///
/// # Returns
///
/// A deterministic query string, e.g. `"Texaco Spanish Town, Main St, Jamaica"`
pub fn build_search_query(record: &RawStationRecord) -> String {
    let name = collapse_whitespace(&record.name);

    let address = record
        .address
        .as_deref()
        .map(collapse_whitespace)
        .filter(|addr| !addr.is_empty());

    match address {
        Some(address) => format!("{}, {}, {}", name, address, SEARCH_REGION_NAME),
        None => format!("{}, {}", name, SEARCH_REGION_NAME),
    }
}
