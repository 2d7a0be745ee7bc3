//! Configuration management and validation.
//!
//! Provides the run configuration for the enrichment pipeline: provider
//! lookup settings, batch limits, geographic bounds, output location, and
//! logging. Configuration is layered: built-in defaults, then an optional
//! TOML file, then environment variables, then CLI overrides applied by
//! the command layer.

use crate::constants::{
    API_KEY_ENV_VAR, DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS, DEFAULT_CHUNK_SIZE,
    DEFAULT_LOOKUP_ENDPOINT, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_MAX_LOOKUP_ATTEMPTS,
    DEFAULT_REQUEST_INTERVAL_MS, JAMAICA_MAX_LAT, JAMAICA_MAX_LON, JAMAICA_MIN_LAT,
    JAMAICA_MIN_LON, MAX_CHUNK_SIZE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Geographic bounding box for accepted coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southern latitude limit (inclusive)
    pub min_lat: f64,
    /// Northern latitude limit (inclusive)
    pub max_lat: f64,
    /// Western longitude limit (inclusive)
    pub min_lon: f64,
    /// Eastern longitude limit (inclusive)
    pub max_lon: f64,
}

impl GeoBounds {
    /// Check whether a coordinate pair falls inside the box
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Validate box orientation
    pub fn validate(&self) -> Result<()> {
        if self.min_lat >= self.max_lat {
            return Err(Error::configuration(format!(
                "Invalid bounding box: min_lat {} must be less than max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon >= self.max_lon {
            return Err(Error::configuration(format!(
                "Invalid bounding box: min_lon {} must be less than max_lon {}",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self {
            min_lat: JAMAICA_MIN_LAT,
            max_lat: JAMAICA_MAX_LAT,
            min_lon: JAMAICA_MIN_LON,
            max_lon: JAMAICA_MAX_LON,
        }
    }
}

/// Provider lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Place-search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Provider API key; falls back to the PLACES_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Minimum delay between consecutive outbound requests, in milliseconds
    ///
    /// Applied globally across the whole run, not per chunk.
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Maximum attempts per lookup (initial attempt + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Base delay for exponential retry backoff, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Ceiling for a single backoff delay, in milliseconds
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,

    /// Request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_LOOKUP_ENDPOINT.to_string()
}

fn default_request_interval_ms() -> u64 {
    DEFAULT_REQUEST_INTERVAL_MS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_LOOKUP_ATTEMPTS
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE_MS
}

fn default_backoff_cap_ms() -> u64 {
    DEFAULT_BACKOFF_CAP_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECS
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            request_interval_ms: default_request_interval_ms(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_cap_ms: default_backoff_cap_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Batch orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Records per chunk (1..=MAX_CHUNK_SIZE)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whether to capture thumbnail imagery references for this run
    #[serde(default)]
    pub capture_imagery: bool,

    /// Bounding box accepted coordinates must fall inside
    #[serde(default)]
    pub bounds: GeoBounds,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            capture_imagery: false,
            bounds: GeoBounds::default(),
        }
    }
}

/// Output location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory run-scoped artifact directories are created under
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

fn default_output_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("station-enricher").join("runs"))
        .unwrap_or_else(|| PathBuf::from("./runs"))
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Global configuration for an enrichment run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Batch orchestration settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Output location settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default config file location (~/.config/station-enricher/config.toml)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("station-enricher").join("config.toml"))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from defaults, an optional TOML file, and the
    /// environment, in that order
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // Environment overlay: API key only, never committed to files
        if config.lookup.api_key.is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
                if !key.trim().is_empty() {
                    config.lookup.api_key = Some(key);
                }
            }
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config file '{}'", path.display()), e))?;
        toml::from_str(&raw).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Create configuration with a custom chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.batch.chunk_size = chunk_size;
        self
    }

    /// Create configuration with a custom inter-request delay
    pub fn with_request_interval_ms(mut self, interval_ms: u64) -> Self {
        self.lookup.request_interval_ms = interval_ms;
        self
    }

    /// Create configuration with a custom maximum attempt count
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.lookup.max_attempts = max_attempts;
        self
    }

    /// Enable imagery capture for this run
    pub fn with_imagery_capture(mut self) -> Self {
        self.batch.capture_imagery = true;
        self
    }

    /// Create configuration with a custom output root
    pub fn with_output_root(mut self, output_root: PathBuf) -> Self {
        self.output.output_root = output_root;
        self
    }

    /// Validate configuration for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if self.batch.chunk_size == 0 {
            return Err(Error::configuration(
                "Chunk size must be greater than 0".to_string(),
            ));
        }

        if self.batch.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::configuration(format!(
                "Chunk size {} exceeds the maximum of {}",
                self.batch.chunk_size, MAX_CHUNK_SIZE
            )));
        }

        if self.lookup.request_interval_ms == 0 {
            return Err(Error::configuration(
                "Request interval must be greater than 0 ms".to_string(),
            ));
        }

        if self.lookup.max_attempts == 0 {
            return Err(Error::configuration(
                "Maximum lookup attempts must be greater than 0".to_string(),
            ));
        }

        if self.lookup.backoff_base_ms == 0 {
            return Err(Error::configuration(
                "Backoff base must be greater than 0 ms".to_string(),
            ));
        }

        if self.lookup.backoff_cap_ms < self.lookup.backoff_base_ms {
            return Err(Error::configuration(format!(
                "Backoff cap {}ms must not be below the backoff base {}ms",
                self.lookup.backoff_cap_ms, self.lookup.backoff_base_ms
            )));
        }

        if self.lookup.endpoint.trim().is_empty() {
            return Err(Error::configuration(
                "Lookup endpoint cannot be empty".to_string(),
            ));
        }

        self.batch.bounds.validate()?;

        Ok(())
    }
}
