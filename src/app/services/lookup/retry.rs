//! Retry policy and the rate-limited, retrying lookup wrapper
//!
//! Wraps a `PlaceLookup` provider with the run's rate limiter and an
//! exponential-backoff retry loop. Retry lives entirely at this layer;
//! the orchestrator above never retries.

use crate::app::services::lookup::client::{LookupError, LookupResult, PlaceLookup};
use crate::app::services::lookup::rate_limiter::RateLimiter;
use crate::config::LookupConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry behavior for transient lookup failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts per lookup (initial attempt + retries)
    pub max_attempts: usize,
    /// Base delay for exponential backoff
    pub base: Duration,
    /// Ceiling for a single backoff delay, before jitter
    pub cap: Duration,
}

impl RetryPolicy {
    /// Create a retry policy
    pub fn new(max_attempts: usize, base: Duration, cap: Duration) -> Self {
        Self {
            max_attempts,
            base,
            cap,
        }
    }

    /// Build a retry policy from the lookup configuration
    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_cap_ms),
        )
    }

    /// Backoff delay after the given failed attempt (1-based), with jitter
    ///
    /// Doubles from the base per attempt, capped, plus a uniform jitter in
    /// `[0, base)` so synchronized clients spread out.
    pub fn delay_for(&self, attempt: usize, rng: &mut StdRng) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        let backoff = self.base.saturating_mul(1u32 << exponent).min(self.cap);

        let jitter_window = self.base.as_millis().max(1) as u64;
        let jitter = Duration::from_millis(rng.gen_range(0..jitter_window));

        backoff + jitter
    }
}

/// Rate-limited, retrying wrapper around a place-search provider
///
/// Owned by the orchestrator for the lifetime of one run. Every attempt
/// waits on the global rate limiter first, so retries consume request
/// budget exactly like first attempts.
pub struct LookupClient {
    provider: Arc<dyn PlaceLookup>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    jitter_rng: StdRng,
}

impl LookupClient {
    /// Create a lookup client with entropy-seeded jitter
    pub fn new(provider: Arc<dyn PlaceLookup>, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self::with_rng(provider, limiter, retry, StdRng::from_entropy())
    }

    /// Create a lookup client with a caller-supplied jitter RNG
    ///
    /// Deterministic seeding keeps backoff timing reproducible in tests.
    pub fn with_rng(
        provider: Arc<dyn PlaceLookup>,
        limiter: RateLimiter,
        retry: RetryPolicy,
        jitter_rng: StdRng,
    ) -> Self {
        Self {
            provider,
            limiter,
            retry,
            jitter_rng,
        }
    }

    /// The configured minimum inter-request interval
    pub fn min_interval(&self) -> Duration {
        self.limiter.min_interval()
    }

    /// Look up one query, retrying transient failures with backoff
    ///
    /// Fatal failures surface immediately; transient failures are retried
    /// up to the policy's attempt limit and then surfaced as the terminal
    /// transient error. Either way the caller sees exactly one result per
    /// query.
    pub async fn lookup(&mut self, query: &str) -> LookupResult<Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.limiter.wait().await;

            match self.provider.search(query).await {
                Ok(payload) => {
                    debug!("Lookup succeeded on attempt {}: {}", attempt, query);
                    return Ok(payload);
                }
                Err(err @ LookupError::Fatal { .. }) => {
                    debug!("Lookup failed fatally: {}", err);
                    return Err(err);
                }
                Err(err) if attempt >= self.retry.max_attempts => {
                    warn!(
                        "Lookup exhausted {} attempts for '{}': {}",
                        self.retry.max_attempts, query, err
                    );
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.retry.delay_for(attempt, &mut self.jitter_rng);
                    warn!(
                        "Lookup attempt {} of {} failed ({}); retrying in {:?}",
                        attempt, self.retry.max_attempts, err, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
