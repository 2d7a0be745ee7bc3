//! Application constants for the station enricher
//!
//! This module contains configuration defaults, domain constants, and
//! small helpers used throughout the enrichment pipeline.

// =============================================================================
// Batch and Rate-Limit Defaults
// =============================================================================

/// Hard ceiling on records per chunk
pub const MAX_CHUNK_SIZE: usize = 25;

/// Default records per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// Default minimum delay between outbound provider requests, in milliseconds
///
/// Matches the provider's documented sustained request rate (5 QPS).
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 200;

/// Default maximum lookup attempts per record (initial attempt + retries)
pub const DEFAULT_MAX_LOOKUP_ATTEMPTS: usize = 3;

/// Default base delay for exponential retry backoff, in milliseconds
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 250;

/// Default ceiling for a single backoff delay, in milliseconds
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 5_000;

/// Default provider request timeout, in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Provider Constants
// =============================================================================

/// Default place-search endpoint
pub const DEFAULT_LOOKUP_ENDPOINT: &str = "https://places.example-api.com/v1/textsearch/json";

/// Region code sent with every provider query
pub const LOOKUP_REGION_CODE: &str = "jm";

/// Region name appended to every search query
pub const SEARCH_REGION_NAME: &str = "Jamaica";

/// Environment variable consulted for the provider API key
pub const API_KEY_ENV_VAR: &str = "PLACES_API_KEY";

// =============================================================================
// Geographic Bounds (Jamaica)
// =============================================================================

/// Southern latitude limit for accepted coordinates
pub const JAMAICA_MIN_LAT: f64 = 17.5;

/// Northern latitude limit for accepted coordinates
pub const JAMAICA_MAX_LAT: f64 = 18.65;

/// Western longitude limit for accepted coordinates
pub const JAMAICA_MIN_LON: f64 = -78.5;

/// Eastern longitude limit for accepted coordinates
pub const JAMAICA_MAX_LON: f64 = -75.9;

// =============================================================================
// Opening Hours and Contact Constants
// =============================================================================

/// Weekday names in canonical order, as emitted by the provider
pub const WEEKDAY_NAMES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Number of entries a complete opening-hours payload must carry
pub const DAYS_PER_WEEK: usize = 7;

/// NANP country code for normalized phone numbers
pub const PHONE_COUNTRY_CODE: &str = "1";

/// Jamaican area codes accepted during phone normalization
pub const JAMAICA_AREA_CODES: &[&str] = &["876", "658"];

// =============================================================================
// Run Artifact Constants
// =============================================================================

/// Filename for the persisted run metadata artifact
pub const RUN_METADATA_FILENAME: &str = "run_metadata.json";

/// Filename for the persisted enriched record set
pub const STATIONS_OUTPUT_FILENAME: &str = "stations.json";

/// Prefix for run identifiers and run directories
pub const RUN_ID_PREFIX: &str = "run-";

/// Timestamp format embedded in run identifiers
pub const RUN_ID_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the canonical index of a weekday name (0 = Monday), if recognized
pub fn weekday_index(day: &str) -> Option<usize> {
    WEEKDAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(day))
}

/// Collapse internal whitespace runs and trim the ends of a string
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a station name for run-wide deduplication
///
/// Case-insensitive, whitespace-collapsed. Two listings with the same
/// normalized name are the same station for dedup purposes.
pub fn normalized_name(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index("Monday"), Some(0));
        assert_eq!(weekday_index("sunday"), Some(6));
        assert_eq!(weekday_index("FRIDAY"), Some(4));
        assert_eq!(weekday_index("Funday"), None);
        assert_eq!(weekday_index(""), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Texaco   Spanish Town "), "Texaco Spanish Town");
        assert_eq!(collapse_whitespace("one\ttwo\nthree"), "one two three");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(normalized_name("Shell Station"), "shell station");
        assert_eq!(normalized_name("shell   station"), "shell station");
        assert_eq!(normalized_name("  SHELL Station  "), "shell station");
    }

    #[test]
    fn test_bounding_box_orientation() {
        assert!(JAMAICA_MIN_LAT < JAMAICA_MAX_LAT);
        assert!(JAMAICA_MIN_LON < JAMAICA_MAX_LON);
    }

    #[test]
    fn test_chunk_defaults_within_ceiling() {
        assert!(DEFAULT_CHUNK_SIZE <= MAX_CHUNK_SIZE);
    }
}
