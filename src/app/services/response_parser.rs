//! Provider response parsing and validation
//!
//! Extracts coordinates, contact info, hours, rating, and optional imagery
//! from the provider's heterogeneous payload, validating every field
//! against domain constraints. A field that fails validation is dropped;
//! only a payload with no usable candidate fails the record.

use crate::app::models::{DayHours, EnrichmentResult};
use crate::config::GeoBounds;
use crate::constants::{
    DAYS_PER_WEEK, JAMAICA_AREA_CODES, PHONE_COUNTRY_CODE, weekday_index,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Failure to extract a usable enrichment result from a provider response
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    /// Create a parse error with a human-readable reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Provider Payload Shape
// =============================================================================

/// The one logical payload shape: a list of candidate place results
#[derive(Debug, Deserialize)]
struct PlacePayload {
    #[serde(default, alias = "candidates", alias = "places")]
    results: Vec<PlaceCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceCandidate {
    #[serde(default)]
    geometry: Option<CandidateGeometry>,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    opening_hours: Option<CandidateHours>,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    user_ratings_total: Option<i64>,
    #[serde(default)]
    photos: Vec<CandidatePhoto>,
}

#[derive(Debug, Deserialize)]
struct CandidateGeometry {
    #[serde(default)]
    location: Option<CandidateLocation>,
}

#[derive(Debug, Deserialize)]
struct CandidateLocation {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CandidateHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CandidatePhoto {
    #[serde(default)]
    photo_reference: Option<String>,
}

// =============================================================================
// Response Parser
// =============================================================================

/// Parses raw provider responses into validated enrichment results
#[derive(Debug)]
pub struct ResponseParser {
    bounds: GeoBounds,
    capture_imagery: bool,
    weekday_line: Regex,
}

impl ResponseParser {
    /// Create a parser for the given bounds and imagery setting
    pub fn new(bounds: GeoBounds, capture_imagery: bool) -> Self {
        Self {
            bounds,
            capture_imagery,
            weekday_line: Regex::new(r"^\s*([A-Za-z]+)\s*:\s*(.*\S)\s*$")
                .expect("weekday line pattern"),
        }
    }

    /// Parse a raw provider response into an enrichment result
    ///
    /// Selects the first candidate result. First match wins; similarly
    /// named listings are not disambiguated.
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw JSON response from the lookup client
    ///
    /// # Returns
    ///
    /// A validated [`EnrichmentResult`], or a [`ParseError`] when the
    /// payload carries no usable candidate
    pub fn parse(&self, payload: &Value) -> Result<EnrichmentResult, ParseError> {
        let payload: PlacePayload = serde_json::from_value(payload.clone())
            .map_err(|e| ParseError::new(format!("unrecognized response shape: {}", e)))?;

        let candidate = payload
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::new("provider returned no candidates"))?;

        let (latitude, longitude) = self.extract_coordinates(&candidate);

        let result = EnrichmentResult {
            latitude,
            longitude,
            phone: candidate
                .formatted_phone_number
                .as_deref()
                .and_then(normalize_phone),
            opening_hours: candidate
                .opening_hours
                .as_ref()
                .and_then(|hours| self.parse_weekday_text(&hours.weekday_text)),
            rating: candidate.rating.filter(|r| (0.0..=5.0).contains(r)),
            review_count: candidate
                .user_ratings_total
                .filter(|count| *count >= 0)
                .map(|count| count as u32),
            thumbnail: if self.capture_imagery {
                candidate
                    .photos
                    .first()
                    .and_then(|photo| photo.photo_reference.clone())
            } else {
                None
            },
        };

        result
            .validate()
            .map_err(|e| ParseError::new(format!("invalid enrichment result: {}", e)))?;

        Ok(result)
    }

    /// Extract a coordinate pair, dropping anything outside the bounds
    ///
    /// Returns both coordinates or neither.
    fn extract_coordinates(&self, candidate: &PlaceCandidate) -> (Option<f64>, Option<f64>) {
        let location = candidate
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.location.as_ref());

        if let Some(location) = location {
            if let (Some(lat), Some(lng)) = (location.lat, location.lng) {
                if self.bounds.contains(lat, lng) {
                    return (Some(lat), Some(lng));
                }
                debug!(
                    "Dropping out-of-bounds coordinates ({}, {})",
                    lat, lng
                );
            }
        }

        (None, None)
    }

    /// Parse weekday hour lines into a complete week, or nothing
    ///
    /// The field is all-or-nothing: anything other than exactly seven
    /// uniquely named, parseable day entries drops the whole field.
    fn parse_weekday_text(&self, lines: &[String]) -> Option<Vec<DayHours>> {
        if lines.len() != DAYS_PER_WEEK {
            debug!(
                "Dropping opening hours: expected {} entries, found {}",
                DAYS_PER_WEEK,
                lines.len()
            );
            return None;
        }

        let mut seen = HashSet::new();
        let mut week = Vec::with_capacity(DAYS_PER_WEEK);

        for line in lines {
            let captures = self.weekday_line.captures(line)?;
            let day = captures.get(1)?.as_str();
            let hours = captures.get(2)?.as_str();

            let index = weekday_index(day)?;
            if !seen.insert(index) {
                debug!("Dropping opening hours: duplicate weekday '{}'", day);
                return None;
            }

            week.push(DayHours {
                day: crate::constants::WEEKDAY_NAMES[index].to_string(),
                hours: hours.to_string(),
            });
        }

        Some(week)
    }
}

// =============================================================================
// Phone Normalization
// =============================================================================

/// Normalize a phone string to canonical E.164 form for Jamaica
///
/// Accepts 7-digit local numbers (assumed 876), 10-digit numbers with a
/// Jamaican area code, and 11-digit national forms. Anything else is
/// unparseable and dropped.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        7 => Some(format!(
            "+{}{}{}",
            PHONE_COUNTRY_CODE, JAMAICA_AREA_CODES[0], digits
        )),
        10 if JAMAICA_AREA_CODES
            .iter()
            .any(|code| digits.starts_with(code)) =>
        {
            Some(format!("+{}{}", PHONE_COUNTRY_CODE, digits))
        }
        11 if digits.starts_with(PHONE_COUNTRY_CODE)
            && JAMAICA_AREA_CODES
                .iter()
                .any(|code| digits[PHONE_COUNTRY_CODE.len()..].starts_with(code)) =>
        {
            Some(format!("+{}", digits))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> ResponseParser {
        ResponseParser::new(GeoBounds::default(), false)
    }

    fn full_weekday_text() -> Vec<String> {
        crate::constants::WEEKDAY_NAMES
            .iter()
            .map(|day| format!("{}: 7:00 AM – 9:00 PM", day))
            .collect()
    }

    fn candidate_payload(weekday_text: Vec<String>) -> Value {
        json!({
            "results": [{
                "geometry": {"location": {"lat": 17.99, "lng": -76.95}},
                "formatted_phone_number": "(876) 555-0123",
                "opening_hours": {"weekday_text": weekday_text},
                "rating": 4.2,
                "user_ratings_total": 87,
                "photos": [{"photo_reference": "thumb-ref-1"}]
            }]
        })
    }

    #[test]
    fn test_parses_complete_candidate() {
        let result = parser().parse(&candidate_payload(full_weekday_text())).unwrap();

        assert_eq!(result.latitude, Some(17.99));
        assert_eq!(result.longitude, Some(-76.95));
        assert_eq!(result.phone.as_deref(), Some("+18765550123"));
        assert_eq!(result.rating, Some(4.2));
        assert_eq!(result.review_count, Some(87));
        assert_eq!(result.opening_hours.as_ref().unwrap().len(), 7);
        // Imagery was not requested
        assert!(result.thumbnail.is_none());
    }

    #[test]
    fn test_first_candidate_wins() {
        let payload = json!({
            "results": [
                {"geometry": {"location": {"lat": 18.01, "lng": -76.80}}},
                {"geometry": {"location": {"lat": 17.99, "lng": -76.95}}}
            ]
        });
        let result = parser().parse(&payload).unwrap();
        assert_eq!(result.latitude, Some(18.01));
    }

    #[test]
    fn test_empty_candidate_list_is_a_parse_error() {
        let err = parser().parse(&json!({"results": []})).unwrap_err();
        assert!(err.reason.contains("no candidates"));
    }

    #[test]
    fn test_out_of_bounds_coordinates_are_dropped_not_fatal() {
        let payload = json!({
            "results": [{
                "geometry": {"location": {"lat": 25.76, "lng": -80.19}},
                "rating": 3.9
            }]
        });
        let result = parser().parse(&payload).unwrap();
        assert!(result.latitude.is_none());
        assert!(result.longitude.is_none());
        // The rest of the record still populates
        assert_eq!(result.rating, Some(3.9));
    }

    #[test]
    fn test_partial_coordinates_are_dropped() {
        let payload = json!({
            "results": [{"geometry": {"location": {"lat": 17.99}}}]
        });
        let result = parser().parse(&payload).unwrap();
        assert!(result.latitude.is_none());
        assert!(result.longitude.is_none());
    }

    #[test]
    fn test_six_day_hours_are_dropped_entirely() {
        let mut text = full_weekday_text();
        text.pop();
        let result = parser().parse(&candidate_payload(text)).unwrap();
        assert!(result.opening_hours.is_none());
    }

    #[test]
    fn test_eight_day_hours_are_dropped_entirely() {
        let mut text = full_weekday_text();
        text.push("Monday: 8:00 AM – 5:00 PM".to_string());
        let result = parser().parse(&candidate_payload(text)).unwrap();
        assert!(result.opening_hours.is_none());
    }

    #[test]
    fn test_duplicated_day_drops_hours_entirely() {
        let mut text = full_weekday_text();
        text[6] = "Monday: 9:00 AM – 1:00 PM".to_string();
        let result = parser().parse(&candidate_payload(text)).unwrap();
        assert!(result.opening_hours.is_none());
    }

    #[test]
    fn test_unknown_day_name_drops_hours_entirely() {
        let mut text = full_weekday_text();
        text[3] = "Feastday: 9:00 AM – 1:00 PM".to_string();
        let result = parser().parse(&candidate_payload(text)).unwrap();
        assert!(result.opening_hours.is_none());
    }

    #[test]
    fn test_out_of_range_rating_is_dropped() {
        let payload = json!({"results": [{"rating": 5.6}]});
        let result = parser().parse(&payload).unwrap();
        assert!(result.rating.is_none());
    }

    #[test]
    fn test_negative_review_count_is_dropped() {
        let payload = json!({"results": [{"user_ratings_total": -4}]});
        let result = parser().parse(&payload).unwrap();
        assert!(result.review_count.is_none());
    }

    #[test]
    fn test_thumbnail_only_when_imagery_requested() {
        let payload = candidate_payload(full_weekday_text());

        let without = parser().parse(&payload).unwrap();
        assert!(without.thumbnail.is_none());

        let with_imagery = ResponseParser::new(GeoBounds::default(), true)
            .parse(&payload)
            .unwrap();
        assert_eq!(with_imagery.thumbnail.as_deref(), Some("thumb-ref-1"));
    }

    #[test]
    fn test_normalize_phone_variants() {
        assert_eq!(normalize_phone("(876) 555-0123").as_deref(), Some("+18765550123"));
        assert_eq!(normalize_phone("876-555-0123").as_deref(), Some("+18765550123"));
        assert_eq!(normalize_phone("555-0123").as_deref(), Some("+18765550123"));
        assert_eq!(normalize_phone("1 876 555 0123").as_deref(), Some("+18765550123"));
        assert_eq!(normalize_phone("658 555 0123").as_deref(), Some("+16585550123"));
    }

    #[test]
    fn test_unparseable_phones_are_dropped() {
        // Wrong region
        assert_eq!(normalize_phone("+44 20 7946 0958"), None);
        // Too short
        assert_eq!(normalize_phone("555-012"), None);
        // Ten digits with a non-Jamaican area code
        assert_eq!(normalize_phone("212-555-0123"), None);
        // No digits at all
        assert_eq!(normalize_phone("call us"), None);
    }

    #[test]
    fn test_unrecognized_shape_is_a_parse_error() {
        let err = parser().parse(&json!({"results": "nope"})).unwrap_err();
        assert!(err.reason.contains("unrecognized response shape"));
    }
}
