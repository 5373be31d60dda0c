// crates/credit-ledger-core/src/core/calendar.rs
// ============================================================================
// Module: Credit Ledger Calendar
// Description: UTC instants, day-bucket keys, and clock sources.
// Purpose: Give every ledger component one deterministic notion of "now".
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The ledger buckets usage by UTC calendar day. [`Timestamp`] is a
//! millisecond instant since the Unix epoch, [`DayKey`] is the `YYYYMMDD`
//! bucket containing an instant, and [`Clock`] abstracts the time source so
//! tests can drive day rollovers and window boundaries explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::Duration;
use time::Month;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of seconds in one UTC day.
pub const SECONDS_PER_DAY: u64 = 86_400;
/// Milliseconds per second.
const MILLIS_PER_SECOND: u64 = 1_000;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Millisecond instant since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// Creates a timestamp from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a timestamp from whole seconds since the epoch.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(MILLIS_PER_SECOND))
    }

    /// Returns milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns whole seconds since the epoch (floored).
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0 / MILLIS_PER_SECOND
    }

    /// Returns a timestamp moved forward by `secs` seconds.
    #[must_use]
    pub const fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs.saturating_mul(MILLIS_PER_SECOND)))
    }
}

// ============================================================================
// SECTION: Day Key
// ============================================================================

/// UTC calendar day bucket, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(Date);

impl DayKey {
    /// Returns the UTC day containing the provided instant.
    #[must_use]
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        let secs = i64::try_from(timestamp.as_secs()).unwrap_or(i64::MAX);
        let instant =
            OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH);
        Self(instant.date())
    }

    /// Parses a `YYYYMMDD` key.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != 8 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        let year: i32 = value.get(0 .. 4)?.parse().ok()?;
        let month: u8 = value.get(4 .. 6)?.parse().ok()?;
        let day: u8 = value.get(6 .. 8)?.parse().ok()?;
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the preceding UTC day.
    #[must_use]
    pub fn previous(self) -> Self {
        self.days_before(1)
    }

    /// Returns the following UTC day.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.next_day().unwrap_or(self.0))
    }

    /// Returns the day `days` before this one.
    #[must_use]
    pub fn days_before(self, days: u32) -> Self {
        Self(self.0.checked_sub(Duration::days(i64::from(days))).unwrap_or(Date::MIN))
    }

    /// Returns the instant at which this day starts (00:00:00 UTC).
    #[must_use]
    pub fn start(self) -> Timestamp {
        let secs = self.0.midnight().assume_utc().unix_timestamp();
        Timestamp::from_secs(u64::try_from(secs).unwrap_or(0))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.0.year(), u8::from(self.0.month()), self.0.day())
    }
}

impl TryFrom<String> for DayKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid day key: {value}"))
    }
}

impl From<DayKey> for String {
    fn from(value: DayKey) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Timestamp::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Manually driven clock for tests and replay tooling.
///
/// Clones share the same underlying instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Current instant in milliseconds.
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock fixed at the provided instant.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(start.as_millis())),
        }
    }

    /// Moves the clock to the provided instant.
    pub fn set(&self, timestamp: Timestamp) {
        self.millis.store(timestamp.as_millis(), Ordering::SeqCst);
    }

    /// Advances the clock by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.millis.fetch_add(secs.saturating_mul(MILLIS_PER_SECOND), Ordering::SeqCst);
    }

    /// Advances the clock by whole days.
    pub fn advance_days(&self, days: u64) {
        self.advance_secs(days.saturating_mul(SECONDS_PER_DAY));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests;
