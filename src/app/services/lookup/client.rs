//! Provider abstraction and HTTP lookup implementation
//!
//! Defines the `PlaceLookup` trait the orchestrator drives, the
//! transient/fatal error taxonomy, and the reqwest-backed client that
//! talks to the real place-search endpoint.

use crate::config::LookupConfig;
use crate::constants::LOOKUP_REGION_CODE;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Classified lookup failure
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// Retryable upstream failure: rate limited, momentarily unavailable,
    /// or a network timeout
    #[error("transient lookup failure: {reason}")]
    Transient { reason: String },

    /// Non-retryable failure: malformed request or permanent rejection
    #[error("fatal lookup failure: {reason}")]
    Fatal { reason: String },
}

impl LookupError {
    /// Create a transient lookup error
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient {
            reason: reason.into(),
        }
    }

    /// Create a fatal lookup error
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal {
            reason: reason.into(),
        }
    }

    /// Check whether this failure may be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Result type for provider lookups
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// A place-search provider
///
/// The single seam between the pipeline and the outside world; tests
/// substitute scripted implementations.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Issue one search and return the provider's raw JSON response
    async fn search(&self, query: &str) -> LookupResult<Value>;
}

/// Classify an HTTP status code into the lookup failure taxonomy
///
/// 429 and 503 are transient; other 4xx are fatal; other 5xx are treated
/// as transient upstream unavailability.
pub fn classify_status(status: StatusCode) -> Option<LookupError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
        return Some(LookupError::transient(format!(
            "provider returned HTTP {}",
            status.as_u16()
        )));
    }

    if status.is_client_error() {
        return Some(LookupError::fatal(format!(
            "provider rejected request with HTTP {}",
            status.as_u16()
        )));
    }

    if status.is_server_error() {
        return Some(LookupError::transient(format!(
            "provider returned HTTP {}",
            status.as_u16()
        )));
    }

    Some(LookupError::fatal(format!(
        "unexpected HTTP status {}",
        status.as_u16()
    )))
}

/// Classify a reqwest transport error into the lookup failure taxonomy
fn classify_request_error(err: reqwest::Error) -> LookupError {
    // Timeouts and connection refusals first: a timed-out request also
    // reports as a request error
    if err.is_timeout() || err.is_connect() {
        return LookupError::transient(format!("network failure: {}", err));
    }
    if err.is_builder() {
        return LookupError::fatal(format!("malformed request: {}", err));
    }
    LookupError::transient(format!("network failure: {}", err))
}

/// HTTP client for the place-search provider
#[derive(Debug, Clone)]
pub struct HttpLookupClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpLookupClient {
    /// Build an HTTP lookup client from the lookup configuration
    ///
    /// Fails if the API key is absent or the underlying client cannot be
    /// constructed.
    pub fn new(config: &LookupConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                crate::Error::configuration(
                    "Provider API key is not configured (set lookup.api_key or PLACES_API_KEY)",
                )
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                crate::Error::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl PlaceLookup for HttpLookupClient {
    async fn search(&self, query: &str) -> LookupResult<Value> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("query", query),
                ("region", LOOKUP_REGION_CODE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(classify_request_error)?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LookupError::fatal(format!("provider returned a non-JSON body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses_pass() {
        assert!(classify_status(StatusCode::OK).is_none());
    }

    #[test]
    fn test_rate_limit_and_unavailable_are_transient() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS).unwrap();
        assert!(err.is_transient());

        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE).unwrap();
        assert!(err.is_transient());
    }

    #[test]
    fn test_other_client_errors_are_fatal() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            let err = classify_status(status).unwrap();
            assert!(!err.is_transient(), "{} should be fatal", status);
        }
    }

    #[test]
    fn test_other_server_errors_are_transient() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::BAD_GATEWAY] {
            let err = classify_status(status).unwrap();
            assert!(err.is_transient(), "{} should be transient", status);
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = LookupConfig::default();
        assert!(HttpLookupClient::new(&config).is_err());

        let config = LookupConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(HttpLookupClient::new(&config).is_err());

        let config = LookupConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert!(HttpLookupClient::new(&config).is_ok());
    }
}
