// crates/credit-ledger-core/src/runtime/idempotency.rs
// ============================================================================
// Module: Idempotency Store
// Description: Write-once operation records keyed by operation id.
// Purpose: Make charges exactly-once per client and operation id.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Records are created once by a successful charge, never overwritten, and
//! removed only by a refund or by expiry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::OperationId;
use crate::core::OperationRecord;
use crate::core::RetentionPolicy;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::interfaces::StoredValue;
use crate::runtime::keys;

// ============================================================================
// SECTION: Idempotency Store
// ============================================================================

/// Operation record accessor bound to one retention policy.
#[derive(Debug, Clone, Copy)]
pub struct IdempotencyStore {
    /// Record lifetime in seconds.
    ttl_seconds: u64,
}

impl IdempotencyStore {
    /// Creates an accessor for the provided retention policy.
    #[must_use]
    pub const fn new(retention: RetentionPolicy) -> Self {
        Self {
            ttl_seconds: retention.operation_ttl_seconds,
        }
    }

    /// Returns the live record for an operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails or the entry is not a record.
    pub fn lookup(
        &self,
        txn: &mut dyn LedgerTransaction,
        op_id: &OperationId,
    ) -> Result<Option<OperationRecord>, StoreError> {
        match txn.get(&keys::operation(op_id))? {
            None => Ok(None),
            Some(StoredValue::Operation(record)) => Ok(Some(record)),
            Some(_) => {
                Err(StoreError::Corrupt(format!("entry for operation {op_id} is not a record")))
            }
        }
    }

    /// Stores a record unless one already exists; returns true when written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read or write fails.
    pub fn insert(
        &self,
        txn: &mut dyn LedgerTransaction,
        op_id: &OperationId,
        record: OperationRecord,
    ) -> Result<bool, StoreError> {
        if self.lookup(txn, op_id)?.is_some() {
            return Ok(false);
        }
        let expires_at = record.charged_at.saturating_add_secs(self.ttl_seconds);
        txn.put(&keys::operation(op_id), StoredValue::Operation(record), expires_at)?;
        Ok(true)
    }

    /// Deletes a record; returns true when one existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    pub fn remove(
        &self,
        txn: &mut dyn LedgerTransaction,
        op_id: &OperationId,
    ) -> Result<bool, StoreError> {
        txn.delete(&keys::operation(op_id))
    }
}
