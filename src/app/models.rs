//! Data models for station enrichment
//!
//! This module contains the core record structures flowing through the
//! enrichment pipeline: raw scraped listings, validated enrichment data,
//! and the merged output records.

pub mod telemetry;

use crate::constants::{DAYS_PER_WEEK, weekday_index};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Raw Station Record
// =============================================================================

/// A scraped petrol station listing before enrichment
///
/// Immutable input to the pipeline; the enrichment stages never mutate it.
/// The listing payload is carried through opaquely and never interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawStationRecord {
    /// Station name as scraped (e.g., "Texaco Spanish Town")
    pub name: String,

    /// Free-text address or location hint, when the source listing had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Source listing price data, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<serde_json::Value>,
}

impl RawStationRecord {
    /// Create a raw record with a name and optional address hint
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        Self {
            name: name.into(),
            address,
            listing: None,
        }
    }

    /// Validate that the record carries a usable name
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::data_validation(
                "Station name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Enrichment Result
// =============================================================================

/// Opening hours for a single day
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DayHours {
    /// Weekday name (Monday..Sunday)
    pub day: String,

    /// Hours text for that day (e.g., "7:00 AM – 9:00 PM", "Closed")
    pub hours: String,
}

/// Validated metadata extracted from a provider response
///
/// Every field is optional; a field that failed validation is dropped
/// rather than failing the record. Latitude and longitude are always both
/// present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EnrichmentResult {
    /// Latitude in WGS84 decimal degrees, inside the configured bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in WGS84 decimal degrees, inside the configured bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Contact phone in canonical E.164 form (e.g., "+18765550123")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Weekly opening hours: absent, or exactly seven unique days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Vec<DayHours>>,

    /// Average rating, 0.0..=5.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// Number of reviews behind the rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,

    /// Thumbnail reference, only populated when imagery capture is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl EnrichmentResult {
    /// Validate field-level domain constraints
    pub fn validate(&self) -> Result<()> {
        // Coordinates must be paired
        match (self.latitude, self.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::data_validation(
                    "Coordinates must be provided as a pair (both latitude and longitude)"
                        .to_string(),
                ));
            }
            _ => {}
        }

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(Error::data_validation(format!(
                    "Invalid rating {}: must be between 0.0 and 5.0",
                    rating
                )));
            }
        }

        if let Some(hours) = &self.opening_hours {
            if hours.len() != DAYS_PER_WEEK {
                return Err(Error::data_validation(format!(
                    "Opening hours must cover exactly {} days, found {}",
                    DAYS_PER_WEEK,
                    hours.len()
                )));
            }

            let mut seen = HashSet::new();
            for entry in hours {
                let index = weekday_index(&entry.day).ok_or_else(|| {
                    Error::data_validation(format!("Unknown weekday name '{}'", entry.day))
                })?;
                if !seen.insert(index) {
                    return Err(Error::data_validation(format!(
                        "Duplicate weekday '{}' in opening hours",
                        entry.day
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check whether the result carries a coordinate pair
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

// =============================================================================
// Enriched Station Record
// =============================================================================

/// Terminal state of a record's enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Provider lookup succeeded and the response validated
    Enriched,
    /// Enrichment could not be completed; raw fields only
    Fallback,
}

/// A raw record merged with its enrichment outcome
///
/// Every input record yields exactly one of these: either `Enriched` with
/// an attached result, or `Fallback` with a failure reason and no result.
/// The constructors make other combinations unrepresentable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnrichedStationRecord {
    /// The original raw listing, preserved verbatim
    #[serde(flatten)]
    pub raw: RawStationRecord,

    /// Terminal enrichment state for this record
    pub enrichment_status: EnrichmentStatus,

    /// Validated enrichment data; present iff status is `Enriched`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentResult>,

    /// Why enrichment failed; present iff status is `Fallback`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl EnrichedStationRecord {
    /// Create an enriched record from a raw listing and a validated result
    pub fn enriched(raw: RawStationRecord, enrichment: EnrichmentResult) -> Self {
        Self {
            raw,
            enrichment_status: EnrichmentStatus::Enriched,
            enrichment: Some(enrichment),
            failure_reason: None,
        }
    }

    /// Create a fallback record carrying raw fields and a failure reason
    pub fn fallback(raw: RawStationRecord, failure_reason: impl Into<String>) -> Self {
        Self {
            raw,
            enrichment_status: EnrichmentStatus::Fallback,
            enrichment: None,
            failure_reason: Some(failure_reason.into()),
        }
    }

    /// Check whether this record fell back to raw fields only
    pub fn is_fallback(&self) -> bool {
        self.enrichment_status == EnrichmentStatus::Fallback
    }
}
