// crates/credit-ledger-core/src/core/calendar/tests.rs
// ============================================================================
// Module: Calendar Unit Tests
// Description: Day-key formatting, parsing, and boundary arithmetic.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use super::Clock;
use super::DayKey;
use super::ManualClock;
use super::SECONDS_PER_DAY;
use super::Timestamp;

/// 2026-03-14T00:00:00Z.
const MARCH_14_2026: u64 = 1_773_446_400;

#[test]
fn day_key_formats_as_compact_date() {
    let day = DayKey::from_timestamp(Timestamp::from_secs(MARCH_14_2026 + 3_600));
    assert_eq!(day.to_string(), "20260314");
}

#[test]
fn day_key_boundary_belongs_to_new_day() {
    let last_second = DayKey::from_timestamp(Timestamp::from_secs(MARCH_14_2026 - 1));
    let midnight = DayKey::from_timestamp(Timestamp::from_secs(MARCH_14_2026));
    assert_eq!(last_second.to_string(), "20260313");
    assert_eq!(midnight.to_string(), "20260314");
    assert_eq!(midnight.previous(), last_second);
    assert_eq!(last_second.next(), midnight);
}

#[test]
fn day_key_start_round_trips() {
    let day = DayKey::from_timestamp(Timestamp::from_secs(MARCH_14_2026 + 45_000));
    assert_eq!(day.start(), Timestamp::from_secs(MARCH_14_2026));
}

#[test]
fn day_key_parse_rejects_malformed_values() {
    assert!(DayKey::parse("2026031").is_none());
    assert!(DayKey::parse("2026-03-1").is_none());
    assert!(DayKey::parse("20261301").is_none());
    assert!(DayKey::parse("20260230").is_none());
    assert_eq!(DayKey::parse("20260101").map(|day| day.to_string()).as_deref(), Some("20260101"));
}

#[test]
fn day_key_crosses_month_and_year() {
    let new_year = DayKey::parse("20260101").unwrap();
    assert_eq!(new_year.previous().to_string(), "20251231");
    assert_eq!(new_year.days_before(31).to_string(), "20251201");
}

#[test]
fn day_key_serializes_as_string() {
    let day = DayKey::parse("20260314").unwrap();
    let json = serde_json::to_string(&day).unwrap();
    assert_eq!(json, "\"20260314\"");
    let parsed: DayKey = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, day);
    assert!(serde_json::from_str::<DayKey>("\"yesterday\"").is_err());
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new(Timestamp::from_secs(MARCH_14_2026));
    let shared = clock.clone();
    clock.advance_days(1);
    assert_eq!(shared.now(), Timestamp::from_secs(MARCH_14_2026 + SECONDS_PER_DAY));
    shared.advance_secs(30);
    assert_eq!(clock.now().as_secs(), MARCH_14_2026 + SECONDS_PER_DAY + 30);
}
