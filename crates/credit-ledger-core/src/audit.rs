// crates/credit-ledger-core/src/audit.rs
// ============================================================================
// Module: Credit Ledger Audit Logging
// Description: Structured audit events for ledger commands and maintenance.
// Purpose: Emit JSON-line audit logs without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are plain serializable structs written as one JSON object
//! per line. Deployments pick a sink (stderr, append-only file, or none) and
//! route the lines into their own logging pipeline.
//!
//! Security posture: events carry client identifiers and outcome codes but
//! never the shared secret or request bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::DayKey;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ledger command audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct OperationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Client identifier.
    pub client_id: String,
    /// Operation label (`charge`, `refund`, `status`, `history`).
    pub operation: &'static str,
    /// Response status.
    pub status: u16,
    /// Error code when the response is an error.
    pub code: Option<String>,
    /// Policy snapshot version used.
    pub policy_version: u64,
    /// Infrastructure error detail, if any.
    pub error: Option<String>,
}

/// Retention sweep audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SweepAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Client identifier.
    pub client_id: String,
    /// Day the sweep ran for.
    pub day: DayKey,
    /// Entries deleted.
    pub deleted: usize,
    /// Whether expired entries may remain.
    pub truncated: bool,
}

/// Policy reload audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// New policy version.
    pub version: u64,
    /// Source the policy was loaded from.
    pub source: Option<String>,
}

/// Security audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Security event kind.
    pub kind: String,
    /// Optional message.
    pub message: Option<String>,
    /// Dev-permissive enabled.
    pub dev_permissive: bool,
}

/// Inputs required to construct an operation audit event.
pub struct OperationAuditEventParams {
    /// Client identifier.
    pub client_id: String,
    /// Operation label.
    pub operation: &'static str,
    /// Response status.
    pub status: u16,
    /// Error code when present.
    pub code: Option<String>,
    /// Policy snapshot version.
    pub policy_version: u64,
    /// Infrastructure error detail.
    pub error: Option<String>,
}

/// Milliseconds since the epoch for event stamps.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

impl OperationAuditEvent {
    /// Creates a new operation audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: OperationAuditEventParams) -> Self {
        Self {
            event: "ledger_operation",
            timestamp_ms: now_ms(),
            client_id: params.client_id,
            operation: params.operation,
            status: params.status,
            code: params.code,
            policy_version: params.policy_version,
            error: params.error,
        }
    }
}

impl SweepAuditEvent {
    /// Creates a new sweep audit event with a consistent timestamp.
    #[must_use]
    pub fn new(client_id: impl Into<String>, day: DayKey, deleted: usize, truncated: bool) -> Self {
        Self {
            event: "ledger_sweep",
            timestamp_ms: now_ms(),
            client_id: client_id.into(),
            day,
            deleted,
            truncated,
        }
    }
}

impl PolicyAuditEvent {
    /// Creates a new policy reload audit event with a consistent timestamp.
    #[must_use]
    pub fn new(version: u64, source: Option<String>) -> Self {
        Self {
            event: "ledger_policy_reload",
            timestamp_ms: now_ms(),
            version,
            source,
        }
    }
}

impl SecurityAuditEvent {
    /// Creates a new security audit event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: Option<String>, dev_permissive: bool) -> Self {
        Self {
            event: "ledger_security",
            timestamp_ms: now_ms(),
            kind: kind.into(),
            message,
            dev_permissive,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for ledger events.
pub trait LedgerAuditSink: Send + Sync {
    /// Record a command audit event.
    fn record(&self, event: &OperationAuditEvent);

    /// Record a sweep audit event.
    fn record_sweep(&self, _event: &SweepAuditEvent) {}

    /// Record a policy reload audit event.
    fn record_policy(&self, _event: &PolicyAuditEvent) {}

    /// Record a security audit event.
    fn record_security(&self, _event: &SecurityAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event line.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl LedgerAuditSink for StderrAuditSink {
    fn record(&self, event: &OperationAuditEvent) {
        Self::emit(event);
    }

    fn record_sweep(&self, event: &SweepAuditEvent) {
        Self::emit(event);
    }

    fn record_policy(&self, event: &PolicyAuditEvent) {
        Self::emit(event);
    }

    fn record_security(&self, event: &SecurityAuditEvent) {
        Self::emit(event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl LedgerAuditSink for FileAuditSink {
    fn record(&self, event: &OperationAuditEvent) {
        self.emit(event);
    }

    fn record_sweep(&self, event: &SweepAuditEvent) {
        self.emit(event);
    }

    fn record_policy(&self, event: &PolicyAuditEvent) {
        self.emit(event);
    }

    fn record_security(&self, event: &SecurityAuditEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl LedgerAuditSink for NoopAuditSink {
    fn record(&self, _event: &OperationAuditEvent) {}
}
