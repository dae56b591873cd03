use lullaby_error::{LlmError, LlmErrorKind};
use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

fn server_error() -> LlmError {
    LlmError::new(LlmErrorKind::Http {
        status_code: 503,
        message: "overloaded".to_string(),
    })
}

#[test]
fn presets_match_component_budgets() {
    assert_eq!(RetryPolicy::categorizer(), RetryPolicy::new(3, 1000, 30));
    assert_eq!(RetryPolicy::guardrails(), RetryPolicy::new(2, 1000, 20));
    assert_eq!(RetryPolicy::judge(), RetryPolicy::new(3, 2000, 60));
    assert_eq!(RetryPolicy::storyteller(), RetryPolicy::new(3, 2000, 60));
}

#[test]
fn delays_double_from_base() {
    let secs = |policy: RetryPolicy| -> Vec<u64> { policy.delays().map(|d| d.as_secs()).collect() };

    assert_eq!(secs(RetryPolicy::categorizer()), vec![1, 2]);
    assert_eq!(secs(RetryPolicy::guardrails()), vec![1]);
    assert_eq!(secs(RetryPolicy::judge()), vec![2, 4]);
    assert_eq!(secs(RetryPolicy::storyteller()), vec![2, 4]);
}

#[test]
fn delays_stop_growing_at_cap() {
    let delays: Vec<Duration> = RetryPolicy::new(6, 1000, 5).delays().collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(5),
            Duration::from_secs(5),
        ]
    );
}

#[test]
fn single_attempt_never_waits() {
    assert_eq!(RetryPolicy::new(1, 1000, 5).delays().count(), 0);
}

#[tokio::test]
async fn waits_follow_schedule_between_attempts() {
    let calls = AtomicUsize::new(0);
    let start = Instant::now();
    let result: Result<(), LlmError> = retry_with_backoff(RetryPolicy::new(3, 50, 1), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(server_error())
    })
    .await;
    let elapsed = start.elapsed();

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 50ms then 100ms, each jittered down by at most half
    assert!(elapsed >= Duration::from_millis(75), "waited only {elapsed:?}");
    assert!(elapsed < Duration::from_millis(400), "waited {elapsed:?}");
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let calls = AtomicUsize::new(0);
    let result = retry_with_backoff(RetryPolicy::new(3, 1, 1), || async {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < 2 { Err(server_error()) } else { Ok("story") }
    })
    .await;

    assert_eq!(result.unwrap(), "story");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn attempts_stop_at_policy_limit() {
    let calls = AtomicUsize::new(0);
    let result: Result<(), LlmError> = retry_with_backoff(RetryPolicy::new(2, 1, 1), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(server_error())
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn timeouts_are_transient() {
    let calls = AtomicUsize::new(0);
    let result: Result<(), LlmError> = retry_with_backoff(RetryPolicy::new(3, 1, 1), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::new(LlmErrorKind::Timeout(20)))
    })
    .await;

    assert!(matches!(result.unwrap_err().kind, LlmErrorKind::Timeout(20)));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
