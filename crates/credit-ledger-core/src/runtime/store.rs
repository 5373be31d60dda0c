// crates/credit-ledger-core/src/runtime/store.rs
// ============================================================================
// Module: Credit Ledger In-Memory Store
// Description: Simple in-memory ledger store for tests and development.
// Purpose: Provide a transactional store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`LedgerStore`]. Each
//! client partition carries its own lease: a transaction holds its client's
//! lease until commit or drop, so transactions for one client are serialized
//! while transactions for different clients never wait on each other. The
//! shared partition index is locked only to look up or create a partition.
//! It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::core::ClientId;
use crate::core::Timestamp;
use crate::interfaces::LedgerStore;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::interfaces::StoredValue;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Stored value with its expiry.
#[derive(Debug, Clone)]
struct Entry {
    /// Stored value.
    value: StoredValue,
    /// Instant from which the entry reads as absent.
    expires_at: Timestamp,
}

/// Entries of one client plus its lease flag.
#[derive(Debug, Default)]
struct PartitionState {
    /// Committed entries keyed by entry key.
    entries: BTreeMap<String, Entry>,
    /// True while a transaction is open on this partition.
    leased: bool,
}

/// One client partition.
#[derive(Debug, Default)]
struct Partition {
    /// Partition contents.
    state: Mutex<PartitionState>,
    /// Signalled when the lease is released.
    released: Condvar,
}

impl Partition {
    /// Locks the partition state.
    fn lock(&self) -> Result<MutexGuard<'_, PartitionState>, StoreError> {
        self.state.lock().map_err(|_| poisoned())
    }
}

/// In-memory ledger store for tests and development.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    /// Partition index keyed by client id.
    partitions: Arc<Mutex<HashMap<String, Arc<Partition>>>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every physically stored key for a client, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when a mutex is poisoned.
    pub fn stored_keys(&self, client_id: &ClientId) -> Result<Vec<String>, StoreError> {
        let partition = self.partition(client_id)?;
        let state = partition.lock()?;
        Ok(state.entries.keys().cloned().collect())
    }

    /// Returns the partition for a client, creating it on first use.
    fn partition(&self, client_id: &ClientId) -> Result<Arc<Partition>, StoreError> {
        let mut index = self.partitions.lock().map_err(|_| poisoned())?;
        Ok(Arc::clone(index.entry(client_id.as_str().to_string()).or_default()))
    }
}

/// Builds the poisoned-mutex error.
fn poisoned() -> StoreError {
    StoreError::Store("ledger store mutex poisoned".to_string())
}

impl LedgerStore for InMemoryLedgerStore {
    fn begin(
        &self,
        client_id: &ClientId,
        now: Timestamp,
    ) -> Result<Box<dyn LedgerTransaction + '_>, StoreError> {
        let partition = self.partition(client_id)?;
        {
            let mut state = partition.lock()?;
            while state.leased {
                state = partition.released.wait(state).map_err(|_| poisoned())?;
            }
            state.leased = true;
        }
        Ok(Box::new(InMemoryTransaction {
            partition,
            now,
            staged: BTreeMap::new(),
        }))
    }
}

// ============================================================================
// SECTION: Transaction
// ============================================================================

/// Write-set staged over a leased client partition.
struct InMemoryTransaction {
    /// Partition whose lease this transaction holds.
    partition: Arc<Partition>,
    /// Transaction instant used for expiry checks.
    now: Timestamp,
    /// Staged writes; `None` marks a delete.
    staged: BTreeMap<String, Option<Entry>>,
}

impl InMemoryTransaction {
    /// Returns a clone of the committed entry for a key.
    fn committed(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.partition.lock()?.entries.get(key).cloned())
    }
}

impl LedgerTransaction for InMemoryTransaction {
    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        let entry = match self.staged.get(key) {
            Some(staged) => staged.clone(),
            None => self.committed(key)?,
        };
        Ok(entry.filter(|entry| entry.expires_at > self.now).map(|entry| entry.value))
    }

    fn put(
        &mut self,
        key: &str,
        value: StoredValue,
        expires_at: Timestamp,
    ) -> Result<(), StoreError> {
        self.staged.insert(
            key.to_string(),
            Some(Entry {
                value,
                expires_at,
            }),
        );
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        let existed = match self.staged.get(key) {
            Some(staged) => staged.is_some(),
            None => self.committed(key)?.is_some(),
        };
        self.staged.insert(key.to_string(), None);
        Ok(existed)
    }

    fn expired_keys(&mut self, limit: usize) -> Result<Vec<String>, StoreError> {
        let state = self.partition.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|(key, entry)| entry.expires_at <= self.now && !self.staged.contains_key(*key))
            .map(|(key, _)| key.clone())
            .take(limit)
            .collect())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        let staged = std::mem::take(&mut self.staged);
        let mut state = self.partition.lock()?;
        for (key, entry) in staged {
            match entry {
                Some(entry) => {
                    state.entries.insert(key, entry);
                }
                None => {
                    state.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        let mut state = self.partition.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.leased = false;
        drop(state);
        self.partition.released.notify_one();
    }
}
