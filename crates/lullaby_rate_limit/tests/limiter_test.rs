use lullaby_rate_limit::RateLimiter;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn guard_releases_slot_on_drop() {
    let limiter = RateLimiter::new(600, 2);
    assert_eq!(limiter.available_slots(), 2);

    let first = limiter.acquire().await.unwrap();
    let second = limiter.acquire().await.unwrap();
    assert_eq!(limiter.available_slots(), 0);
    assert!(timeout(Duration::from_millis(50), limiter.acquire()).await.is_err());

    drop(first);
    assert_eq!(limiter.available_slots(), 1);
    drop(second);
    assert_eq!(limiter.available_slots(), 2);
}

#[tokio::test]
async fn clones_share_one_budget() {
    let limiter = RateLimiter::new(0, 1);
    let clone = limiter.clone();

    let _guard = limiter.acquire().await.unwrap();
    assert_eq!(clone.available_slots(), 0);
}

#[test]
fn zero_concurrency_is_treated_as_one() {
    let limiter = RateLimiter::new(60, 0);
    assert_eq!(limiter.max_concurrent(), 1);
    assert_eq!(limiter.requests_per_minute(), 60);
}

#[tokio::test]
async fn per_minute_quota_blocks_burst_beyond_limit() {
    let limiter = RateLimiter::new(1, 5);
    let first = limiter.acquire().await.unwrap();
    drop(first);

    // Slot is free again but the quota is spent for the next minute
    assert_eq!(limiter.available_slots(), 5);
    assert!(timeout(Duration::from_millis(100), limiter.acquire()).await.is_err());
}
