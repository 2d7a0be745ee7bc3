//! Tests for the batch orchestration module
//!
//! Shared fixtures: raw record builders, scripted providers, and a test
//! configuration with a short rate-limit interval.

pub mod deduplication_tests;

use crate::app::models::RawStationRecord;
use crate::app::services::lookup::{LookupResult, PlaceLookup};
use crate::config::Config;
use serde_json::{Value, json};
use std::sync::Mutex;

/// Create a test record with a name only
pub fn make_record(name: &str) -> RawStationRecord {
    RawStationRecord::new(name, None)
}

/// Create a test record with a name and address hint
pub fn make_record_with_address(name: &str, address: &str) -> RawStationRecord {
    RawStationRecord::new(name, Some(address.to_string()))
}

/// Create a test configuration with a short inter-request interval
pub fn test_config() -> Config {
    Config::default().with_request_interval_ms(10)
}

/// A provider payload with one in-bounds candidate
pub fn candidate_payload(lat: f64, lng: f64) -> Value {
    json!({
        "results": [{
            "geometry": {"location": {"lat": lat, "lng": lng}},
            "rating": 4.0
        }]
    })
}

/// Closure-backed provider that records every query it receives
pub struct FnProvider {
    respond: Box<dyn Fn(&str) -> LookupResult<Value> + Send + Sync>,
    queries: Mutex<Vec<String>>,
}

impl FnProvider {
    pub fn new(respond: impl Fn(&str) -> LookupResult<Value> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of lookup calls observed
    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl PlaceLookup for FnProvider {
    async fn search(&self, query: &str) -> LookupResult<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        (self.respond)(query)
    }
}
