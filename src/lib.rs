//! Station Enricher Library
//!
//! A Rust library for enriching scraped Jamaican petrol station listings
//! with standardized geographic and business metadata from an external
//! place-search provider.
//!
//! This library provides tools for:
//! - Building normalized provider search queries from raw listings
//! - Rate-limited provider lookups with classified retry behavior
//! - Parsing and validating heterogeneous provider payloads
//! - Merging enrichment data with graceful per-record fallback
//! - Chunked batch orchestration with per-chunk telemetry
//! - Run-scoped persistence of results and audit metadata

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod lookup;
        pub mod merger;
        pub mod orchestrator;
        pub mod query_builder;
        pub mod recorder;
        pub mod response_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{EnrichedStationRecord, EnrichmentResult, EnrichmentStatus, RawStationRecord};
pub use config::Config;

/// Result type alias for the station enricher
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for enrichment run operations
///
/// Per-record pipeline failures are deliberately not represented here: a
/// failed lookup or parse degrades that record to a fallback and the run
/// continues. Only configuration, input, and persistence problems abort a
/// run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input listings file could not be read or decoded
    #[error("Input error in '{path}': {message}")]
    InputFormat { path: String, message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Run artifacts could not be persisted
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// JSON encoding/decoding error
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Run not found in the output root
    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an input format error
    pub fn input_format(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a persistence error with an I/O source
    pub fn persistence(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persistence {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a persistence error without an underlying I/O source
    pub fn persistence_message(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            source: None,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a run-not-found error
    pub fn run_not_found(run_id: impl Into<String>) -> Self {
        Self::RunNotFound {
            run_id: run_id.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON encoding/decoding failed".to_string(),
            source: error,
        }
    }
}
