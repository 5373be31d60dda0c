// crates/credit-ledger-core/src/runtime/sweeper.rs
// ============================================================================
// Module: Retention Sweeper
// Description: Bounded once-per-day deletion of expired client entries.
// Purpose: Keep partitions small without relying on backend TTLs.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The sweep runs inside the same transaction as a mutating command and is
//! gated by a `cleanup::<today>` marker written in that transaction, so it
//! runs at most once per UTC day per client. Each run deletes the previous
//! day's marker plus at most one batch of expired entries; anything left
//! over waits for a later day and reads as absent in the meantime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DayKey;
use crate::core::RetentionPolicy;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::interfaces::StoredValue;
use crate::runtime::keys;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Summary of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Day the sweep ran for.
    pub day: DayKey,
    /// Entries deleted, including the previous marker.
    pub deleted: usize,
    /// True when the batch filled and expired entries may remain.
    pub truncated: bool,
}

// ============================================================================
// SECTION: Sweeper
// ============================================================================

/// Once-per-day sweeper bound to one retention policy.
#[derive(Debug, Clone, Copy)]
pub struct RetentionSweeper {
    /// Maximum expired entries deleted per run.
    batch_size: usize,
}

impl RetentionSweeper {
    /// Creates a sweeper for the provided retention policy.
    #[must_use]
    pub const fn new(retention: RetentionPolicy) -> Self {
        Self {
            batch_size: retention.sweep_batch_size,
        }
    }

    /// Sweeps unless today's marker exists; returns `None` when skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan, deletes, or marker write fail.
    pub fn run(
        &self,
        txn: &mut dyn LedgerTransaction,
        today: DayKey,
    ) -> Result<Option<SweepReport>, StoreError> {
        let marker = keys::cleanup(today);
        if txn.get(&marker)?.is_some() {
            return Ok(None);
        }

        let mut deleted = 0;
        if txn.delete(&keys::cleanup(today.previous()))? {
            deleted += 1;
        }
        let expired = txn.expired_keys(self.batch_size)?;
        let truncated = self.batch_size > 0 && expired.len() >= self.batch_size;
        for key in &expired {
            if txn.delete(key)? {
                deleted += 1;
            }
        }

        txn.put(&marker, StoredValue::Marker, today.next().next().start())?;
        Ok(Some(SweepReport {
            day: today,
            deleted,
            truncated,
        }))
    }
}
