// crates/credit-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable LedgerStore backed by SQLite WAL.
// Purpose: Persist client ledger entries with explicit expiry.
// Dependencies: credit-ledger-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Entries live in one `ledger_entries` table keyed by `(client_id,
//! entry_key)`. A [`SqliteLedgerStore`] serializes access through one
//! connection; each ledger transaction holds the connection for its whole
//! lifetime inside `BEGIN IMMEDIATE`, commits explicitly, and rolls back when
//! dropped uncommitted.
//! Security posture: stored payloads are untrusted; oversize or undecodable
//! values surface as corruption instead of being trusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use credit_ledger_core::ClientId;
use credit_ledger_core::LedgerStore;
use credit_ledger_core::LedgerTransaction;
use credit_ledger_core::StoreError;
use credit_ledger_core::StoredValue;
use credit_ledger_core::Timestamp;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum serialized entry size accepted by the store.
pub const MAX_VALUE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default tuning for a path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteLedgerStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Stored payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteLedgerStoreError> for StoreError {
    fn from(error: SqliteLedgerStoreError) -> Self {
        match error {
            SqliteLedgerStoreError::Io(message) => Self::Io(message),
            SqliteLedgerStoreError::Db(message) => Self::Store(message),
            SqliteLedgerStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteLedgerStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteLedgerStoreError::Invalid(message) => Self::Invalid(message),
            SqliteLedgerStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Corrupt(format!(
                "value_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps an engine error to the store error.
#[allow(clippy::needless_pass_by_value, reason = "Used as a map_err adapter.")]
fn db_error(error: rusqlite::Error) -> SqliteLedgerStoreError {
    SqliteLedgerStoreError::Db(error.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed ledger store with WAL support.
#[derive(Clone)]
pub struct SqliteLedgerStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLedgerStore {
    /// Opens an `SQLite`-backed ledger store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteLedgerStoreError`] when the database cannot be opened
    /// or initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteLedgerStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the number of physically stored entries for a client.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteLedgerStoreError`] when the count query fails.
    pub fn entry_count(&self, client_id: &ClientId) -> Result<u64, SqliteLedgerStoreError> {
        let guard = self.lock()?;
        let count: i64 = guard
            .query_row(
                "SELECT COUNT(*) FROM ledger_entries WHERE client_id = ?1",
                params![client_id.as_str()],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        u64::try_from(count)
            .map_err(|_| SqliteLedgerStoreError::Corrupt("negative entry count".to_string()))
    }

    /// Acquires the connection lock.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteLedgerStoreError> {
        self.connection.lock().map_err(|_| SqliteLedgerStoreError::Db("mutex poisoned".to_string()))
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn begin(
        &self,
        client_id: &ClientId,
        now: Timestamp,
    ) -> Result<Box<dyn LedgerTransaction + '_>, StoreError> {
        let guard = self.lock()?;
        guard.execute_batch("BEGIN IMMEDIATE;").map_err(db_error)?;
        Ok(Box::new(SqliteTransaction {
            connection: guard,
            client: client_id.as_str().to_string(),
            now: to_sql_millis(now),
            finished: false,
        }))
    }
}

// ============================================================================
// SECTION: Transaction
// ============================================================================

/// Open `BEGIN IMMEDIATE` transaction over one client's rows.
struct SqliteTransaction<'a> {
    /// Connection held for the whole transaction.
    connection: MutexGuard<'a, Connection>,
    /// Client partition.
    client: String,
    /// Transaction instant in epoch milliseconds.
    now: i64,
    /// Set once `COMMIT` succeeded.
    finished: bool,
}

impl SqliteTransaction<'_> {
    /// Reads a row regardless of expiry.
    fn read_row(&self, key: &str) -> Result<Option<(Vec<u8>, i64)>, SqliteLedgerStoreError> {
        let length: Option<i64> = self
            .connection
            .query_row(
                "SELECT length(value_json) FROM ledger_entries WHERE client_id = ?1 AND \
                 entry_key = ?2",
                params![self.client, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        let Some(length) = length else {
            return Ok(None);
        };
        let length = usize::try_from(length)
            .map_err(|_| SqliteLedgerStoreError::Invalid(format!("negative length for {key}")))?;
        if length > MAX_VALUE_BYTES {
            return Err(SqliteLedgerStoreError::TooLarge {
                max_bytes: MAX_VALUE_BYTES,
                actual_bytes: length,
            });
        }
        self.connection
            .query_row(
                "SELECT value_json, expires_at FROM ledger_entries WHERE client_id = ?1 AND \
                 entry_key = ?2",
                params![self.client, key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(db_error)
    }
}

impl LedgerTransaction for SqliteTransaction<'_> {
    fn get(&mut self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        let Some((bytes, expires_at)) = self.read_row(key)? else {
            return Ok(None);
        };
        if expires_at <= self.now {
            return Ok(None);
        }
        let value = serde_json::from_slice(&bytes).map_err(|err| {
            SqliteLedgerStoreError::Corrupt(format!("undecodable value for {key}: {err}"))
        })?;
        Ok(Some(value))
    }

    fn put(
        &mut self,
        key: &str,
        value: StoredValue,
        expires_at: Timestamp,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&value)
            .map_err(|err| SqliteLedgerStoreError::Invalid(err.to_string()))?;
        if bytes.len() > MAX_VALUE_BYTES {
            return Err(StoreError::Invalid(format!(
                "value for {key} exceeds size limit: {} bytes (max {MAX_VALUE_BYTES})",
                bytes.len()
            )));
        }
        self.connection
            .execute(
                "INSERT INTO ledger_entries (client_id, entry_key, value_json, expires_at) \
                 VALUES (?1, ?2, ?3, ?4) ON CONFLICT (client_id, entry_key) DO UPDATE SET \
                 value_json = excluded.value_json, expires_at = excluded.expires_at",
                params![self.client, key, bytes, to_sql_millis(expires_at)],
            )
            .map_err(db_error)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
        let changed = self
            .connection
            .execute(
                "DELETE FROM ledger_entries WHERE client_id = ?1 AND entry_key = ?2",
                params![self.client, key],
            )
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn expired_keys(&mut self, limit: usize) -> Result<Vec<String>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut statement = self
            .connection
            .prepare(
                "SELECT entry_key FROM ledger_entries WHERE client_id = ?1 AND expires_at <= ?2 \
                 ORDER BY entry_key LIMIT ?3",
            )
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![self.client, self.now, limit], |row| row.get::<_, String>(0))
            .map_err(db_error)?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(db_error)?);
        }
        Ok(keys)
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.connection.execute_batch("COMMIT;").map_err(db_error)?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.connection.execute_batch("ROLLBACK;");
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a timestamp to the stored integer form.
fn to_sql_millis(timestamp: Timestamp) -> i64 {
    i64::try_from(timestamp.as_millis()).unwrap_or(i64::MAX)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteLedgerStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteLedgerStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteLedgerStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteLedgerStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteLedgerStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteLedgerStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteLedgerStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteLedgerStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_error)?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteLedgerStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS ledger_entries (
                    client_id TEXT NOT NULL,
                    entry_key TEXT NOT NULL,
                    value_json BLOB NOT NULL,
                    expires_at INTEGER NOT NULL,
                    PRIMARY KEY (client_id, entry_key)
                );
                CREATE INDEX IF NOT EXISTS idx_ledger_entries_expiry
                    ON ledger_entries (client_id, expires_at);",
            )
            .map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteLedgerStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}
