//! Retry with jittered exponential backoff.

use derive_getters::Getters;
use lullaby_error::RetryableError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::iter::Take;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialFactorBackoff, jitter_range};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// How many times to try a call and how long to wait between attempts.
///
/// # Examples
///
/// ```
/// use lullaby_rate_limit::RetryPolicy;
///
/// let policy = RetryPolicy::guardrails();
/// assert_eq!(*policy.max_attempts(), 2);
/// assert_eq!(*policy.base_delay_ms(), 1000);
/// assert_eq!(*policy.max_delay_secs(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    max_attempts: usize,
    /// Delay before the first retry
    base_delay_ms: u64,
    /// Upper bound on any single delay
    max_delay_secs: u64,
}

impl RetryPolicy {
    /// Create a custom policy.
    pub fn new(max_attempts: usize, base_delay_ms: u64, max_delay_secs: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            max_delay_secs,
        }
    }

    /// Categorizer calls: 3 attempts, 1s base, 30s cap.
    pub fn categorizer() -> Self {
        Self::new(3, 1000, 30)
    }

    /// Guardrail calls: 2 attempts, 1s base, 20s cap.
    pub fn guardrails() -> Self {
        Self::new(2, 1000, 20)
    }

    /// Judge calls: 3 attempts, 2s base, 60s cap.
    pub fn judge() -> Self {
        Self::new(3, 2000, 60)
    }

    /// Storyteller calls: 3 attempts, 2s base, 60s cap.
    pub fn storyteller() -> Self {
        Self::new(3, 2000, 60)
    }

    /// The wait before each retry, without jitter.
    ///
    /// Delays double from `base_delay_ms` and never exceed `max_delay_secs`.
    ///
    /// ```
    /// use lullaby_rate_limit::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let delays: Vec<_> = RetryPolicy::judge().delays().collect();
    /// assert_eq!(delays, vec![Duration::from_secs(2), Duration::from_secs(4)]);
    /// ```
    pub fn delays(&self) -> Take<ExponentialFactorBackoff> {
        ExponentialFactorBackoff::from_millis(self.base_delay_ms, 2.0)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .take(self.max_attempts.saturating_sub(1))
    }
}

/// Run `operation`, retrying transient failures according to `policy`.
///
/// Errors whose [`RetryableError::is_retryable`] is false are returned
/// immediately. Between attempts it sleeps for a jittered share (half to
/// all) of [`RetryPolicy::delays`]. After the last attempt the final error
/// is returned.
///
/// # Example
///
/// ```
/// use lullaby_error::{LlmError, LlmErrorKind};
/// use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// # tokio_test();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test() {
/// let calls = AtomicUsize::new(0);
/// let result: Result<u32, LlmError> = retry_with_backoff(RetryPolicy::new(3, 1, 1), || async {
///     calls.fetch_add(1, Ordering::SeqCst);
///     Err(LlmError::new(LlmErrorKind::Http {
///         status_code: 401,
///         message: "bad key".into(),
///     }))
/// })
/// .await;
///
/// assert!(result.is_err());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(policy: RetryPolicy, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    // Jitter only shortens a delay, so the cap still holds.
    let strategy = policy.delays().map(jitter_range(0.5, 1.0));

    Retry::spawn(strategy, || async {
        match operation().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Transient error, will retry");
                Err(RetryError::Transient {
                    err: e,
                    retry_after: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "Permanent error, failing immediately");
                Err(RetryError::Permanent(e))
            }
        }
    })
    .await
}
