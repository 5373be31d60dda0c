// crates/credit-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Credit Ledger Interfaces
// Description: Backend-agnostic storage interfaces for client ledgers.
// Purpose: Let ledger logic run unchanged over memory or durable stores.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`LedgerStore`] partitions entries by client and hands out
//! [`LedgerTransaction`]s. A transaction sees its own writes, applies all of
//! them on [`LedgerTransaction::commit`], and discards them when dropped.
//! Every entry carries an explicit expiry instant; reads at or after it
//! behave as if the entry were absent.
//!
//! Security posture: stored values are decoded from persistence and must be
//! treated as untrusted; backends report undecodable payloads as
//! [`StoreError::Corrupt`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ClientId;
use crate::core::OperationRecord;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Stored Values
// ============================================================================

/// Value held under a ledger key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredValue {
    /// Numeric counter (rate window count or daily usage).
    Counter {
        /// Counter value.
        value: u64,
    },
    /// Cached successful operation.
    Operation(OperationRecord),
    /// Presence-only marker.
    Marker,
}

impl StoredValue {
    /// Wraps a counter value.
    #[must_use]
    pub const fn counter(value: u64) -> Self {
        Self::Counter {
            value,
        }
    }

    /// Returns the counter value when this is a counter.
    #[must_use]
    pub const fn as_counter(&self) -> Option<u64> {
        match self {
            Self::Counter {
                value,
            } => Some(*value),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ledger store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("ledger store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("ledger store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("ledger store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("ledger store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("ledger store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store Traits
// ============================================================================

/// Atomic view over one client's entries.
///
/// Dropping a transaction without committing discards its writes.
pub trait LedgerTransaction {
    /// Reads a live entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails or the value is corrupt.
    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, StoreError>;

    /// Writes an entry with an absolute expiry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write cannot be staged.
    fn put(&mut self, key: &str, value: StoredValue, expires_at: Timestamp)
    -> Result<(), StoreError>;

    /// Deletes an entry, returning true when a live or expired entry existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete cannot be staged.
    fn delete(&mut self, key: &str) -> Result<bool, StoreError>;

    /// Lists up to `limit` keys whose expiry has passed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the scan fails.
    fn expired_keys(&mut self, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Applies every staged write atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the commit fails; nothing is applied.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Client-partitioned ledger storage.
pub trait LedgerStore: Send + Sync {
    /// Opens a transaction over one client's entries as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot start a transaction.
    fn begin(
        &self,
        client_id: &ClientId,
        now: Timestamp,
    ) -> Result<Box<dyn LedgerTransaction + '_>, StoreError>;
}
