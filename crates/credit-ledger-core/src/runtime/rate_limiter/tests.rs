// crates/credit-ledger-core/src/runtime/rate_limiter/tests.rs
// ============================================================================
// Module: Rate Limiter Unit Tests
// Description: Window alignment, counting, and header values.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use super::FixedWindowRateLimiter;
use crate::core::ClientId;
use crate::core::RateLimitPolicy;
use crate::core::Timestamp;
use crate::interfaces::LedgerStore;
use crate::runtime::InMemoryLedgerStore;

fn limiter(limit: u64) -> FixedWindowRateLimiter {
    FixedWindowRateLimiter::new(RateLimitPolicy {
        limit,
        window_seconds: 60,
        grace_seconds: 5,
    })
}

#[test]
fn boundary_instant_starts_new_window() {
    let limiter = limiter(5);
    assert_eq!(limiter.window_start(Timestamp::from_secs(119)), 60);
    assert_eq!(limiter.window_start(Timestamp::from_secs(120)), 120);
    assert_eq!(limiter.window_start(Timestamp::from_millis(119_999)), 60);
}

#[test]
fn rejection_still_counts_and_reports_retry_after() {
    let store = InMemoryLedgerStore::new();
    let client = ClientId::parse("c").unwrap();
    let limiter = limiter(2);
    let now = Timestamp::from_secs(130);

    let mut txn = store.begin(&client, now).unwrap();
    let first = limiter.consume(txn.as_mut(), now).unwrap();
    let second = limiter.consume(txn.as_mut(), now).unwrap();
    let third = limiter.consume(txn.as_mut(), now).unwrap();
    let fourth = limiter.consume(txn.as_mut(), now).unwrap();

    assert!(first.allowed && second.allowed);
    assert_eq!(second.remaining, 0);
    assert!(!third.allowed);
    assert_eq!(third.count, 3);
    assert_eq!(fourth.count, 4);
    assert_eq!(third.reset_at, 180);
    assert_eq!(third.retry_after, 50);
    assert_eq!(third.headers().retry_after, Some(50));
    assert_eq!(first.headers().retry_after, None);
}

#[test]
fn retry_after_is_at_least_one_second() {
    let store = InMemoryLedgerStore::new();
    let client = ClientId::parse("c").unwrap();
    let limiter = limiter(0);
    let now = Timestamp::from_millis(179_900);
    let mut txn = store.begin(&client, now).unwrap();
    let decision = limiter.consume(txn.as_mut(), now).unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.retry_after, 1);
}
