//! Rate limiter built on governor and a Tokio semaphore.
//!
//! Governor's GCRA quota paces requests per minute; the semaphore caps how
//! many requests are in flight at once.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use lullaby_error::{LlmError, LlmErrorKind, LullabyResult};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client-side request limiter.
///
/// Cloning shares the underlying quota and semaphore, so every clone draws
/// from the same budget.
///
/// # Example
///
/// ```
/// use lullaby_rate_limit::RateLimiter;
///
/// # tokio_test();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test() {
/// let limiter = RateLimiter::new(60, 2);
/// let guard = limiter.acquire().await.unwrap();
/// assert_eq!(limiter.available_slots(), 1);
/// drop(guard);
/// assert_eq!(limiter.available_slots(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    requests_per_minute: u32,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` requests and at most
    /// `max_concurrent` in flight.
    ///
    /// A per-minute rate of zero disables pacing. A concurrency of zero is
    /// treated as one.
    pub fn new(requests_per_minute: u32, max_concurrent: u32) -> Self {
        let rpm_limiter = NonZeroU32::new(requests_per_minute)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));

        let max_concurrent = max_concurrent.max(1) as usize;

        Self {
            requests_per_minute,
            rpm_limiter,
            concurrent_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Wait for the per-minute quota and a concurrency slot.
    ///
    /// The slot is held until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the semaphore has been closed.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> LullabyResult<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // Concurrency slot last, so a slot is never held while pacing.
        let permit = self
            .concurrent_semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| LlmError::new(LlmErrorKind::RateLimiterClosed))?;

        debug!(
            available = self.concurrent_semaphore.available_permits(),
            "Acquired request slot"
        );
        Ok(RateLimiterGuard { _permit: permit })
    }

    /// Concurrency slots not currently held.
    pub fn available_slots(&self) -> usize {
        self.concurrent_semaphore.available_permits()
    }

    /// Configured per-minute quota, zero when unpaced.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Configured concurrency cap.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_minute", &self.requests_per_minute)
            .field("max_concurrent", &self.max_concurrent)
            .field("available_slots", &self.available_slots())
            .finish()
    }
}

/// RAII guard that releases the concurrency slot on drop.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
