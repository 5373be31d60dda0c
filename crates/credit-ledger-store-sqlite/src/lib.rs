// crates/credit-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable LedgerStore backend using SQLite WAL.
// Purpose: Persist client ledgers so usage and records survive restarts.
// Dependencies: credit-ledger-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`credit_ledger_core::LedgerStore`].
//! Every ledger transaction maps to one `BEGIN IMMEDIATE` transaction, so a
//! crash can never persist a usage update without its operation record.
//! Security posture: database contents are untrusted and decoded fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_VALUE_BYTES;
pub use store::SqliteLedgerStore;
pub use store::SqliteLedgerStoreError;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
