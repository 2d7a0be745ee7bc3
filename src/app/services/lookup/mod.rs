//! Rate-limited provider lookup
//!
//! This module contains the outbound half of the enrichment pipeline: the
//! provider abstraction, its HTTP implementation, and the rate-limit and
//! retry machinery wrapped around every call.
//!
//! # Architecture
//!
//! - [`client`] - `PlaceLookup` trait, HTTP implementation, error taxonomy
//! - [`rate_limiter`] - owned-value minimum-interval clock
//! - [`retry`] - backoff policy and the retrying `LookupClient` wrapper
//!
//! # Failure Taxonomy
//!
//! Every lookup failure is classified as `Transient` (rate limited or
//! momentarily unavailable upstream; retried with backoff) or `Fatal`
//! (malformed request or permanent rejection; surfaced immediately). The
//! caller treats either terminal outcome as "no enrichment available" and
//! degrades the record, so a bad lookup never aborts a run.
//!
//! # Rate Limiting
//!
//! The limiter is a plain owned value threaded through `&mut` calls. The
//! run is a single logical task, so there is nothing to lock; the clock
//! advances on every attempt, successful or not, keeping the whole run
//! under the provider's documented request rate.

pub mod client;
pub mod rate_limiter;
pub mod retry;

// Re-export main types for easy access
pub use client::{HttpLookupClient, LookupError, LookupResult, PlaceLookup};
pub use rate_limiter::RateLimiter;
pub use retry::{LookupClient, RetryPolicy};
