//! Minimum-interval rate limiting for outbound provider requests
//!
//! The limiter is a single owned clock value: the orchestrator owns it for
//! the lifetime of a run and threads it into every lookup. The run is one
//! logical task, so no locking is involved, and separate runs can never
//! interfere with each other's timing.

use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Enforces a minimum delay between consecutive outbound requests
///
/// The clock advances on every [`RateLimiter::wait`], so each lookup
/// attempt (success or failure) consumes one slot of request budget.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum inter-request interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Create a limiter from an interval in milliseconds
    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    /// The configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep out the remainder of the interval, then advance the clock
    ///
    /// The first call of a run returns immediately.
    pub async fn wait(&mut self) {
        if let Some(previous) = self.last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
