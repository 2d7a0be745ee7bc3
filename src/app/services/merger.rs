//! Record merging and fallback degradation
//!
//! Combines a raw listing with its enrichment outcome into exactly one
//! output record. Success attaches the validated result verbatim; any
//! failure degrades the record to a fallback carrying the raw fields and
//! a stable reason string for telemetry. The pipeline never drops a
//! station.

use crate::app::models::{EnrichedStationRecord, EnrichmentResult, RawStationRecord};
use crate::app::services::lookup::LookupError;
use crate::app::services::response_parser::ParseError;
use std::fmt;

/// Why a record's enrichment could not be completed
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentFailure {
    /// Lookup failed transiently and retries were exhausted
    TransientLookup(String),
    /// Lookup was rejected permanently
    FatalLookup(String),
    /// A response arrived but carried no usable candidate
    Parse(String),
}

impl fmt::Display for EnrichmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientLookup(reason) => write!(f, "transient_lookup_failure: {}", reason),
            Self::FatalLookup(reason) => write!(f, "fatal_lookup_failure: {}", reason),
            Self::Parse(reason) => write!(f, "parse_error: {}", reason),
        }
    }
}

impl From<LookupError> for EnrichmentFailure {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::Transient { reason } => Self::TransientLookup(reason),
            LookupError::Fatal { reason } => Self::FatalLookup(reason),
        }
    }
}

impl From<ParseError> for EnrichmentFailure {
    fn from(error: ParseError) -> Self {
        Self::Parse(error.reason)
    }
}

/// Merge a raw record with a validated enrichment result
///
/// All raw fields are preserved; the result is attached verbatim.
pub fn merge_enriched(
    raw: RawStationRecord,
    enrichment: EnrichmentResult,
) -> EnrichedStationRecord {
    EnrichedStationRecord::enriched(raw, enrichment)
}

/// Degrade a raw record to a fallback after a failed enrichment
///
/// The raw fields survive untouched and the failure reason is recorded
/// for batch telemetry.
pub fn merge_fallback(
    raw: RawStationRecord,
    failure: &EnrichmentFailure,
) -> EnrichedStationRecord {
    EnrichedStationRecord::fallback(raw, failure.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::EnrichmentStatus;

    fn raw() -> RawStationRecord {
        RawStationRecord {
            name: "Texaco Spanish Town".to_string(),
            address: Some("Main St".to_string()),
            listing: Some(serde_json::json!({"diesel": 198.4, "e10_87": 182.9})),
        }
    }

    #[test]
    fn test_merge_enriched_preserves_raw_fields() {
        let enrichment = EnrichmentResult {
            latitude: Some(17.99),
            longitude: Some(-76.95),
            ..Default::default()
        };
        let record = merge_enriched(raw(), enrichment.clone());

        assert_eq!(record.enrichment_status, EnrichmentStatus::Enriched);
        assert_eq!(record.raw, raw());
        assert_eq!(record.enrichment, Some(enrichment));
        assert!(record.failure_reason.is_none());
    }

    #[test]
    fn test_merge_fallback_keeps_raw_and_reason() {
        let failure = EnrichmentFailure::TransientLookup("provider returned HTTP 503".to_string());
        let record = merge_fallback(raw(), &failure);

        assert_eq!(record.enrichment_status, EnrichmentStatus::Fallback);
        assert_eq!(record.raw, raw());
        assert!(record.enrichment.is_none());
        assert_eq!(
            record.failure_reason.as_deref(),
            Some("transient_lookup_failure: provider returned HTTP 503")
        );
    }

    #[test]
    fn test_failure_taxonomy_rendering() {
        let transient = EnrichmentFailure::from(LookupError::transient("timed out"));
        assert_eq!(transient.to_string(), "transient_lookup_failure: timed out");

        let fatal = EnrichmentFailure::from(LookupError::fatal("HTTP 400"));
        assert_eq!(fatal.to_string(), "fatal_lookup_failure: HTTP 400");

        let parse = EnrichmentFailure::from(ParseError::new("provider returned no candidates"));
        assert_eq!(parse.to_string(), "parse_error: provider returned no candidates");
    }
}
