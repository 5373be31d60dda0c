// crates/credit-ledger-core/src/runtime/usage.rs
// ============================================================================
// Module: Daily Usage Ledger
// Description: Per-day credit counters inside a client partition.
// Purpose: Read and update cumulative daily usage with explicit expiry.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Usage for a day stays readable for the configured retention horizon after
//! the day ends, which keeps history queries over the last 30 days exact.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::DayKey;
use crate::core::MAX_HISTORY_DAYS;
use crate::core::RetentionPolicy;
use crate::core::SECONDS_PER_DAY;
use crate::core::Timestamp;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::interfaces::StoredValue;
use crate::runtime::keys;

// ============================================================================
// SECTION: Usage Ledger
// ============================================================================

/// Daily usage accessor bound to one retention policy.
#[derive(Debug, Clone, Copy)]
pub struct UsageLedger {
    /// Days of usage kept readable after a day ends.
    retention_days: u32,
}

impl UsageLedger {
    /// Creates a usage ledger for the provided retention policy.
    #[must_use]
    pub const fn new(retention: RetentionPolicy) -> Self {
        Self {
            retention_days: retention.usage_retention_days,
        }
    }

    /// Returns the instant after which a day's usage reads as absent.
    #[must_use]
    pub fn expires_at(&self, day: DayKey) -> Timestamp {
        let days = u64::from(self.retention_days).max(u64::from(MAX_HISTORY_DAYS)) + 1;
        day.start().saturating_add_secs(days.saturating_mul(SECONDS_PER_DAY))
    }

    /// Returns credits used on a day (0 when absent).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be read.
    pub fn used(&self, txn: &mut dyn LedgerTransaction, day: DayKey) -> Result<u64, StoreError> {
        match txn.get(&keys::usage(day))? {
            None => Ok(0),
            Some(value) => value.as_counter().ok_or_else(|| {
                StoreError::Corrupt(format!("usage for {day} is not a counter"))
            }),
        }
    }

    /// Overwrites a day's usage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be written.
    pub fn set(
        &self,
        txn: &mut dyn LedgerTransaction,
        day: DayKey,
        value: u64,
    ) -> Result<(), StoreError> {
        txn.put(&keys::usage(day), StoredValue::counter(value), self.expires_at(day))
    }

    /// Lowers a day's usage by `amount`, stopping at zero, and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter cannot be read or written.
    pub fn subtract_clamped(
        &self,
        txn: &mut dyn LedgerTransaction,
        day: DayKey,
        amount: u64,
    ) -> Result<u64, StoreError> {
        let next = self.used(txn, day)?.saturating_sub(amount);
        self.set(txn, day, next)?;
        Ok(next)
    }

    /// Returns usage for `days` days ending today, keyed by `YYYYMMDD`.
    ///
    /// `days` is clamped to `1..=30`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a counter cannot be read.
    pub fn history(
        &self,
        txn: &mut dyn LedgerTransaction,
        today: DayKey,
        days: u32,
    ) -> Result<BTreeMap<String, u64>, StoreError> {
        let days = days.clamp(1, MAX_HISTORY_DAYS);
        let mut history = BTreeMap::new();
        for offset in 0 .. days {
            let day = today.days_before(offset);
            history.insert(day.to_string(), self.used(txn, day)?);
        }
        Ok(history)
    }
}
