// crates/credit-ledger-config/src/config.rs
// ============================================================================
// Module: Credit Ledger Configuration
// Description: Configuration loading and validation for the ledger service.
// Purpose: Provide strict, fail-closed config parsing with explicit limits.
// Dependencies: credit-ledger-core, credit-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! This module defines the `credit-ledger.toml` model. Every section has
//! defaults matching a small deployment; [`CreditLedgerConfig::to_policy`]
//! turns the pricing, limit, and retention sections into a versioned
//! [`LedgerPolicy`] snapshot.
//!
//! Security posture: configuration is untrusted input and must be validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use credit_ledger_core::ActorSettings;
use credit_ledger_core::LedgerPolicy;
use credit_ledger_core::RateLimitPolicy;
use credit_ledger_core::RetentionPolicy;
use credit_ledger_core::TierCapTable;
use credit_ledger_core::ToolCostTable;
use credit_ledger_core::ToolName;
use credit_ledger_core::core::policy::DEFAULT_FREE_CAP;
use credit_ledger_core::core::policy::DEFAULT_OPERATION_TTL_SECONDS;
use credit_ledger_core::core::policy::DEFAULT_PRO_CAP;
use credit_ledger_core::core::policy::DEFAULT_RATE_GRACE_SECONDS;
use credit_ledger_core::core::policy::DEFAULT_RATE_LIMIT;
use credit_ledger_core::core::policy::DEFAULT_RATE_WINDOW_SECONDS;
use credit_ledger_core::core::policy::DEFAULT_SWEEP_BATCH_SIZE;
use credit_ledger_core::core::policy::DEFAULT_USAGE_RETENTION_DAYS;
use credit_ledger_core::core::policy::MAX_HISTORY_DAYS;
use credit_ledger_store_sqlite::SqliteStoreConfig;
use credit_ledger_store_sqlite::SqliteStoreMode;
use credit_ledger_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "credit-ledger.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CREDIT_LEDGER_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8787";
/// Default maximum request body size.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;
/// Upper bound for `server.max_body_bytes`.
const MAX_BODY_BYTES_LIMIT: usize = 1024 * 1024;
/// Minimum shared secret length.
const MIN_SECRET_LENGTH: usize = 16;
/// Maximum shared secret length.
const MAX_SECRET_LENGTH: usize = 256;
/// Maximum number of priced tools.
const MAX_TOOL_ENTRIES: usize = 256;
/// Maximum tool name length.
const MAX_TOOL_NAME_LENGTH: usize = 64;
/// Default actor idle timeout in milliseconds.
const DEFAULT_IDLE_TIMEOUT_MS: u64 = 60_000;
/// Default actor mailbox capacity.
const DEFAULT_MAILBOX_CAPACITY: usize = 64;
/// Upper bound for actor mailbox capacity.
const MAX_MAILBOX_CAPACITY: usize = 4096;
/// Default `SQLite` busy timeout.
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for the credit ledger service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditLedgerConfig {
    /// Internal RPC server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Daily caps and tool prices.
    #[serde(default)]
    pub credits: CreditsConfig,
    /// Per-client rate limit.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Entry lifetimes and sweep sizing.
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Client actor lifecycle.
    #[serde(default)]
    pub actors: ActorsConfig,
    /// Ledger store backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit sink.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
    /// Modification time of the source file (not serialized).
    #[serde(skip)]
    pub source_modified_at: Option<SystemTime>,
}

impl CreditLedgerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `CREDIT_LEDGER_CONFIG`, then
    /// `credit-ledger.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.source_modified_at = modified_at(&resolved);
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.credits.validate()?;
        self.rate_limit.validate()?;
        self.retention.validate()?;
        self.actors.validate()?;
        self.store.validate()?;
        self.audit.validate()?;
        self.to_policy(0).validate().map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Builds the ledger policy snapshot described by this configuration.
    #[must_use]
    pub fn to_policy(&self, version: u64) -> LedgerPolicy {
        LedgerPolicy {
            version,
            tool_costs: ToolCostTable::new(
                self.credits
                    .tool_costs
                    .iter()
                    .map(|(tool, cost)| (ToolName::new(tool.as_str()), *cost)),
            ),
            tier_caps: TierCapTable {
                free: self.credits.free_daily,
                pro: self.credits.pro_daily,
            },
            rate_limit: RateLimitPolicy {
                limit: self.rate_limit.limit,
                window_seconds: self.rate_limit.window_seconds,
                grace_seconds: self.rate_limit.grace_seconds,
            },
            retention: RetentionPolicy {
                operation_ttl_seconds: self.retention.operation_ttl_seconds,
                usage_retention_days: self.retention.usage_retention_days,
                sweep_batch_size: self.retention.sweep_batch_size,
            },
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Internal RPC server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Shared secret expected in `X-Internal-Secret`.
    #[serde(default)]
    pub internal_secret: Option<String>,
    /// Environment variable holding the shared secret.
    #[serde(default)]
    pub internal_secret_env: Option<String>,
    /// Accept unauthenticated callers (development only).
    #[serde(default)]
    pub dev_permissive: bool,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            internal_secret: None,
            internal_secret_env: None,
            dev_permissive: false,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind))
        })
    }

    /// Resolves the shared secret from inline config or the environment.
    ///
    /// Returns `None` only when no secret is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the named environment variable
    /// is unset or the secret violates length limits.
    pub fn resolve_secret(&self) -> Result<Option<String>, ConfigError> {
        let secret = match (&self.internal_secret, &self.internal_secret_env) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "set only one of server.internal_secret and server.internal_secret_env"
                        .to_string(),
                ));
            }
            (Some(secret), None) => secret.clone(),
            (None, Some(var)) => env::var(var).map_err(|_| {
                ConfigError::Invalid(format!("server.internal_secret_env {var} is not set"))
            })?,
            (None, None) => return Ok(None),
        };
        if secret.len() < MIN_SECRET_LENGTH || secret.len() > MAX_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "internal secret must be {MIN_SECRET_LENGTH}-{MAX_SECRET_LENGTH} bytes"
            )));
        }
        Ok(Some(secret))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be 1-{MAX_BODY_BYTES_LIMIT}"
            )));
        }
        let secret = self.resolve_secret()?;
        if secret.is_none() && !self.dev_permissive {
            return Err(ConfigError::Invalid(
                "server requires internal_secret or internal_secret_env unless dev_permissive = \
                 true"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default maximum body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// ============================================================================
// SECTION: Credits
// ============================================================================

/// Daily caps and tool pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditsConfig {
    /// Free tier daily cap.
    #[serde(default = "default_free_daily")]
    pub free_daily: u64,
    /// Pro tier daily cap.
    #[serde(default = "default_pro_daily")]
    pub pro_daily: u64,
    /// Tool name to cost; unlisted tools cost 1.
    #[serde(default)]
    pub tool_costs: BTreeMap<String, u64>,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            free_daily: default_free_daily(),
            pro_daily: default_pro_daily(),
            tool_costs: BTreeMap::new(),
        }
    }
}

impl CreditsConfig {
    /// Validates pricing configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.free_daily == 0 || self.pro_daily == 0 {
            return Err(ConfigError::Invalid("credits daily caps must be positive".to_string()));
        }
        if self.tool_costs.len() > MAX_TOOL_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "credits.tool_costs exceeds {MAX_TOOL_ENTRIES} entries"
            )));
        }
        for (tool, cost) in &self.tool_costs {
            if tool.trim().is_empty() || tool.len() > MAX_TOOL_NAME_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "credits.tool_costs key must be 1-{MAX_TOOL_NAME_LENGTH} characters"
                )));
            }
            if *cost == 0 {
                return Err(ConfigError::Invalid(format!(
                    "credits.tool_costs.{tool} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Returns the default free tier cap.
const fn default_free_daily() -> u64 {
    DEFAULT_FREE_CAP
}

/// Returns the default pro tier cap.
const fn default_pro_daily() -> u64 {
    DEFAULT_PRO_CAP
}

// ============================================================================
// SECTION: Rate Limit
// ============================================================================

/// Fixed-window rate limit configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Requests per window.
    #[serde(default = "default_rate_limit")]
    pub limit: u64,
    /// Window length in seconds.
    #[serde(default = "default_rate_window_seconds")]
    pub window_seconds: u64,
    /// Extra lifetime of a window counter in seconds.
    #[serde(default = "default_rate_grace_seconds")]
    pub grace_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_rate_limit(),
            window_seconds: default_rate_window_seconds(),
            grace_seconds: default_rate_grace_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Validates rate limit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 || self.window_seconds == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.limit and rate_limit.window_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default rate limit.
const fn default_rate_limit() -> u64 {
    DEFAULT_RATE_LIMIT
}

/// Returns the default rate window.
const fn default_rate_window_seconds() -> u64 {
    DEFAULT_RATE_WINDOW_SECONDS
}

/// Returns the default rate grace period.
const fn default_rate_grace_seconds() -> u64 {
    DEFAULT_RATE_GRACE_SECONDS
}

// ============================================================================
// SECTION: Retention
// ============================================================================

/// Retention and sweep configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Operation record lifetime in seconds.
    #[serde(default = "default_operation_ttl_seconds")]
    pub operation_ttl_seconds: u64,
    /// Days of past usage kept readable.
    #[serde(default = "default_usage_retention_days")]
    pub usage_retention_days: u32,
    /// Maximum keys deleted per daily sweep.
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            operation_ttl_seconds: default_operation_ttl_seconds(),
            usage_retention_days: default_usage_retention_days(),
            sweep_batch_size: default_sweep_batch_size(),
        }
    }
}

impl RetentionConfig {
    /// Validates retention configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "retention.operation_ttl_seconds must be positive".to_string(),
            ));
        }
        if self.usage_retention_days < MAX_HISTORY_DAYS {
            return Err(ConfigError::Invalid(format!(
                "retention.usage_retention_days must be at least {MAX_HISTORY_DAYS}"
            )));
        }
        if self.sweep_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "retention.sweep_batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default operation record lifetime.
const fn default_operation_ttl_seconds() -> u64 {
    DEFAULT_OPERATION_TTL_SECONDS
}

/// Returns the default usage retention.
const fn default_usage_retention_days() -> u32 {
    DEFAULT_USAGE_RETENTION_DAYS
}

/// Returns the default sweep batch size.
const fn default_sweep_batch_size() -> usize {
    DEFAULT_SWEEP_BATCH_SIZE
}

// ============================================================================
// SECTION: Actors
// ============================================================================

/// Client actor lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorsConfig {
    /// Idle time before an actor retires, in milliseconds.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Per-client mailbox capacity.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

impl Default for ActorsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

impl ActorsConfig {
    /// Returns runtime actor settings.
    #[must_use]
    pub const fn settings(&self) -> ActorSettings {
        ActorSettings {
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            mailbox_capacity: self.mailbox_capacity,
        }
    }

    /// Validates actor configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(ConfigError::Invalid("actors.idle_timeout_ms must be positive".to_string()));
        }
        if self.mailbox_capacity == 0 || self.mailbox_capacity > MAX_MAILBOX_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "actors.mailbox_capacity must be 1-{MAX_MAILBOX_CAPACITY}"
            )));
        }
        Ok(())
    }
}

/// Returns the default idle timeout.
const fn default_idle_timeout_ms() -> u64 {
    DEFAULT_IDLE_TIMEOUT_MS
}

/// Returns the default mailbox capacity.
const fn default_mailbox_capacity() -> usize {
    DEFAULT_MAILBOX_CAPACITY
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Ledger store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory store (state lost on restart).
    #[default]
    Memory,
    /// `SQLite` store.
    Sqlite,
}

/// Ledger store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` configuration when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }

    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path(path)
            }
        }
    }
}

/// Returns the default busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink type.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, Some(path)) => validate_path(path),
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("audit.sink = \"file\" requires audit.path".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid with the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the modification time of a file, if readable.
#[must_use]
pub fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("path must be non-empty".to_string()));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}
