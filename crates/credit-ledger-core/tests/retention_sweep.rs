// crates/credit-ledger-core/tests/retention_sweep.rs
// ============================================================================
// Module: Retention Sweep Tests
// Description: Once-per-day bounded deletion of expired entries.
// Purpose: Ensure partitions shrink without touching live data.
// Dependencies: credit-ledger-core
// ============================================================================
//! ## Overview
//! Charges across several rate windows leave expired counters behind; later
//! days must delete them in bounded batches while keeping usage and live
//! operation records.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;

use credit_ledger_core::ClientId;
use credit_ledger_core::ClientLedger;
use credit_ledger_core::InMemoryLedgerStore;
use credit_ledger_core::LedgerOutcome;
use credit_ledger_core::LedgerPolicy;
use credit_ledger_core::LedgerRequest;
use credit_ledger_core::ManualClock;
use credit_ledger_core::OperationId;
use credit_ledger_core::Tier;
use credit_ledger_core::Timestamp;
use credit_ledger_core::ToolName;
use credit_ledger_core::runtime::keys;

/// 2026-03-14T10:00:00Z.
const NOW: u64 = 1_773_482_400;
/// Seconds per day.
const DAY: u64 = 86_400;

fn charge(ledger: &ClientLedger, policy: &LedgerPolicy, op: &str) -> LedgerOutcome {
    ledger
        .execute(
            policy,
            &LedgerRequest::Charge {
                tier: Tier::Free,
                tool: ToolName::new("summarize"),
                op_id: OperationId::parse(op).unwrap(),
            },
        )
        .expect("charge")
}

fn count_prefix(keys: &[String], prefix: &str) -> usize {
    keys.iter().filter(|key| key.starts_with(prefix)).count()
}

/// Verifies sweeps are bounded, gated per day, and spare live entries.
#[test]
fn sweep_is_bounded_daily_and_preserves_live_entries() {
    let store = InMemoryLedgerStore::new();
    let clock = ManualClock::new(Timestamp::from_secs(NOW));
    let client = ClientId::parse("sweepy").unwrap();
    let ledger = ClientLedger::new(client.clone(), Arc::new(store.clone()), Arc::new(clock.clone()));

    let mut narrow = LedgerPolicy::default();
    narrow.retention.sweep_batch_size = 2;

    let first = charge(&ledger, &narrow, "a");
    assert_eq!(first.sweep.map(|report| report.deleted), Some(0));
    clock.advance_secs(60);
    assert!(charge(&ledger, &narrow, "b").sweep.is_none());
    clock.advance_secs(60);
    assert!(charge(&ledger, &narrow, "c").sweep.is_none());
    let stored = store.stored_keys(&client).unwrap();
    assert_eq!(count_prefix(&stored, keys::RATE_WINDOW_PREFIX), 3);

    // Day 2: previous marker plus a batch of two expired windows.
    clock.set(Timestamp::from_secs(NOW + DAY));
    let report = charge(&ledger, &narrow, "d").sweep.expect("day two sweep");
    assert_eq!(report.day.to_string(), "20260315");
    assert_eq!(report.deleted, 3);
    assert!(report.truncated);
    let stored = store.stored_keys(&client).unwrap();
    assert_eq!(count_prefix(&stored, keys::RATE_WINDOW_PREFIX), 2);
    assert_eq!(count_prefix(&stored, keys::CLEANUP_PREFIX), 1);
    assert_eq!(count_prefix(&stored, keys::OPERATION_PREFIX), 4);
    assert!(charge(&ledger, &narrow, "e").sweep.is_none());

    // Day 3: leftover window, day-two window, and the first record expire.
    clock.set(Timestamp::from_secs(NOW + 2 * DAY));
    let wide = LedgerPolicy::default();
    let report = charge(&ledger, &wide, "f").sweep.expect("day three sweep");
    assert_eq!(report.deleted, 4);
    assert!(!report.truncated);
    let stored = store.stored_keys(&client).unwrap();
    assert!(!stored.contains(&keys::operation(&OperationId::parse("a").unwrap())));
    assert!(stored.contains(&keys::operation(&OperationId::parse("b").unwrap())));
    assert_eq!(count_prefix(&stored, keys::USAGE_PREFIX), 3);
}

/// Verifies usage outside the retention horizon is eventually deleted.
#[test]
fn usage_beyond_retention_is_swept() {
    let store = InMemoryLedgerStore::new();
    let clock = ManualClock::new(Timestamp::from_secs(NOW));
    let client = ClientId::parse("long-lived").unwrap();
    let ledger = ClientLedger::new(client.clone(), Arc::new(store.clone()), Arc::new(clock.clone()));
    let policy = LedgerPolicy::default();

    charge(&ledger, &policy, "old");
    clock.advance_secs(40 * DAY);
    charge(&ledger, &policy, "new");

    let stored = store.stored_keys(&client).unwrap();
    assert_eq!(count_prefix(&stored, keys::USAGE_PREFIX), 1);
    assert_eq!(count_prefix(&stored, keys::OPERATION_PREFIX), 1);
    assert!(stored.contains(&keys::operation(&OperationId::parse("new").unwrap())));
}
