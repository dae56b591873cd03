//! Request rate limiting and retry with backoff.
//!
//! Every model call in the story pipeline goes through two layers:
//! - [`RateLimiter`] keeps requests under a per-minute quota and a
//!   concurrency cap.
//! - [`retry_with_backoff`] retries transient failures (rate limits,
//!   server errors, timeouts) with jittered exponential backoff, using one
//!   of the [`RetryPolicy`] presets.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod limiter;
mod retry;

pub use limiter::{RateLimiter, RateLimiterGuard};
pub use retry::{RetryPolicy, retry_with_backoff};
