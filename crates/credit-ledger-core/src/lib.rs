// crates/credit-ledger-core/src/lib.rs
// ============================================================================
// Module: Credit Ledger Core Library
// Description: Public API surface for the per-client credit ledger.
// Purpose: Expose ledger types, storage interfaces, and runtime actors.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Credit Ledger core meters paid tool invocations per client. Each client is
//! owned by a single actor that serializes its requests and runs every charge
//! or refund as one atomic storage transaction, enforcing a fixed-window rate
//! limit, a daily tier-scaled credit cap, and exactly-once charging per
//! operation identifier.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileAuditSink;
pub use audit::LedgerAuditSink;
pub use audit::NoopAuditSink;
pub use audit::OperationAuditEvent;
pub use audit::OperationAuditEventParams;
pub use audit::PolicyAuditEvent;
pub use audit::SecurityAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::SweepAuditEvent;
pub use interfaces::LedgerStore;
pub use interfaces::LedgerTransaction;
pub use interfaces::StoreError;
pub use interfaces::StoredValue;
pub use runtime::ActorSettings;
pub use runtime::ClientLedger;
pub use runtime::FixedWindowRateLimiter;
pub use runtime::IdempotencyStore;
pub use runtime::InMemoryLedgerStore;
pub use runtime::LedgerError;
pub use runtime::LedgerOutcome;
pub use runtime::LedgerRouter;
pub use runtime::RateLimitDecision;
pub use runtime::RetentionSweeper;
pub use runtime::SweepReport;
pub use runtime::UsageLedger;
