// crates/credit-ledger-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Validate SQLite LedgerStore behavior.
// Purpose: Ensure atomic commits, rollback on drop, expiry, and durability.
// Dependencies: credit-ledger-store-sqlite, credit-ledger-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed ledger store, including a full
//! ledger run over a reopened database and adversarial on-disk payloads.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use credit_ledger_core::ClientId;
use credit_ledger_core::ClientLedger;
use credit_ledger_core::LedgerPolicy;
use credit_ledger_core::LedgerRequest;
use credit_ledger_core::LedgerStore;
use credit_ledger_core::ManualClock;
use credit_ledger_core::OperationId;
use credit_ledger_core::StoreError;
use credit_ledger_core::StoredValue;
use credit_ledger_core::Tier;
use credit_ledger_core::Timestamp;
use credit_ledger_core::ToolName;
use credit_ledger_store_sqlite::SqliteLedgerStore;
use credit_ledger_store_sqlite::SqliteLedgerStoreError;
use credit_ledger_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// 2026-03-14T10:00:00Z.
const NOW: u64 = 1_773_482_400;

fn open(dir: &TempDir) -> SqliteLedgerStore {
    SqliteLedgerStore::new(&SqliteStoreConfig::at(dir.path().join("ledger.db"))).expect("open store")
}

fn client() -> ClientId {
    ClientId::parse("sqlite-client").unwrap()
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

/// Verifies committed writes persist and uncommitted writes roll back.
#[test]
fn commit_persists_and_drop_rolls_back() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let now = Timestamp::from_secs(NOW);

    let mut txn = store.begin(&client(), now).unwrap();
    txn.put("used::20260314", StoredValue::counter(4), Timestamp::from_secs(NOW + 60)).unwrap();
    txn.commit().unwrap();

    {
        let mut txn = store.begin(&client(), now).unwrap();
        txn.put("used::20260314", StoredValue::counter(9), Timestamp::from_secs(NOW + 60))
            .unwrap();
        assert_eq!(txn.get("used::20260314").unwrap(), Some(StoredValue::counter(9)));
    }

    let mut txn = store.begin(&client(), now).unwrap();
    assert_eq!(txn.get("used::20260314").unwrap(), Some(StoredValue::counter(4)));
}

/// Verifies expired rows read as absent but remain until deleted.
#[test]
fn expired_rows_are_invisible_and_listed() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let mut txn = store.begin(&client(), Timestamp::from_secs(NOW)).unwrap();
    txn.put("rl::1", StoredValue::counter(1), Timestamp::from_secs(NOW + 10)).unwrap();
    txn.put("rl::2", StoredValue::counter(1), Timestamp::from_secs(NOW + 20)).unwrap();
    txn.put("op::keep", StoredValue::Marker, Timestamp::from_secs(NOW + 1_000)).unwrap();
    txn.commit().unwrap();

    let mut txn = store.begin(&client(), Timestamp::from_secs(NOW + 20)).unwrap();
    assert_eq!(txn.get("rl::1").unwrap(), None);
    assert_eq!(txn.get("op::keep").unwrap(), Some(StoredValue::Marker));
    assert_eq!(txn.expired_keys(1).unwrap(), vec!["rl::1".to_string()]);
    assert_eq!(txn.expired_keys(10).unwrap(), vec!["rl::1".to_string(), "rl::2".to_string()]);
    assert!(txn.delete("rl::1").unwrap());
    assert!(!txn.delete("rl::missing").unwrap());
    txn.commit().unwrap();
    assert_eq!(store.entry_count(&client()).unwrap(), 2);
}

/// Verifies clients do not see each other's rows.
#[test]
fn clients_are_partitioned() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let other = ClientId::parse("other").unwrap();
    let now = Timestamp::from_secs(NOW);

    let mut txn = store.begin(&client(), now).unwrap();
    txn.put("op::shared", StoredValue::Marker, Timestamp::from_secs(NOW + 60)).unwrap();
    txn.commit().unwrap();

    let mut txn = store.begin(&other, now).unwrap();
    assert_eq!(txn.get("op::shared").unwrap(), None);
    assert!(txn.expired_keys(10).unwrap().is_empty());
}

// ============================================================================
// SECTION: Durability
// ============================================================================

/// Verifies ledger state survives reopening the database.
#[test]
fn ledger_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(Timestamp::from_secs(NOW));
    let policy = LedgerPolicy::default();
    let charge = LedgerRequest::Charge {
        tier: Tier::Free,
        tool: ToolName::new("summarize"),
        op_id: OperationId::parse("durable-op").unwrap(),
    };

    let first = {
        let ledger = ClientLedger::new(client(), Arc::new(open(&dir)), Arc::new(clock.clone()));
        ledger.execute(&policy, &charge).unwrap().response
    };
    assert_eq!(first.status, 200);

    let ledger = ClientLedger::new(client(), Arc::new(open(&dir)), Arc::new(clock.clone()));
    let replay = ledger.execute(&policy, &charge).unwrap().response;
    assert_eq!(replay.body, first.body);
    let status = ledger
        .execute(
            &policy,
            &LedgerRequest::Status {
                tier: Tier::Free,
            },
        )
        .unwrap()
        .response;
    assert_eq!(status.body["used"], 1);
}

// ============================================================================
// SECTION: Adversarial Storage
// ============================================================================

/// Verifies undecodable payloads fail closed as corruption.
#[test]
fn corrupt_payload_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    let store = SqliteLedgerStore::new(&SqliteStoreConfig::at(&path)).unwrap();
    drop(store);

    let connection = rusqlite::Connection::open(&path).unwrap();
    connection
        .execute(
            "INSERT INTO ledger_entries (client_id, entry_key, value_json, expires_at) VALUES \
             (?1, ?2, ?3, ?4)",
            rusqlite::params![
                "sqlite-client",
                "used::20260314",
                b"not json".to_vec(),
                i64::MAX
            ],
        )
        .unwrap();
    drop(connection);

    let store = SqliteLedgerStore::new(&SqliteStoreConfig::at(&path)).unwrap();
    let mut txn = store.begin(&client(), Timestamp::from_secs(NOW)).unwrap();
    let err = txn.get("used::20260314").unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)), "unexpected error: {err:?}");
}

/// Verifies a foreign schema version is rejected.
#[test]
fn schema_version_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    drop(SqliteLedgerStore::new(&SqliteStoreConfig::at(&path)).unwrap());

    let connection = rusqlite::Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", []).unwrap();
    drop(connection);

    let Err(err) = SqliteLedgerStore::new(&SqliteStoreConfig::at(&path)) else {
        panic!("expected version mismatch");
    };
    assert!(matches!(err, SqliteLedgerStoreError::VersionMismatch(_)));
}

/// Verifies directories are rejected as store paths.
#[test]
fn directory_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let Err(err) = SqliteLedgerStore::new(&SqliteStoreConfig::at(dir.path())) else {
        panic!("expected invalid path");
    };
    assert!(matches!(err, SqliteLedgerStoreError::Invalid(_)));
}
