// crates/credit-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Credit Ledger Runtime
// Description: Rate limiting, usage accounting, idempotency, and actors.
// Purpose: Execute ledger commands with single-writer consistency per client.
// Dependencies: crate::{audit, core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! Runtime modules implement the per-client ledger. The component helpers
//! ([`FixedWindowRateLimiter`], [`UsageLedger`], [`IdempotencyStore`],
//! [`RetentionSweeper`]) operate inside one [`crate::LedgerTransaction`];
//! [`ClientLedger`] composes them into commands and [`LedgerRouter`] owns one
//! actor task per client so commands for a client never interleave.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod idempotency;
pub mod keys;
pub mod ledger;
pub mod rate_limiter;
pub mod router;
pub mod store;
pub mod sweeper;
pub mod usage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use idempotency::IdempotencyStore;
pub use ledger::ClientLedger;
pub use ledger::LedgerError;
pub use ledger::LedgerOutcome;
pub use rate_limiter::FixedWindowRateLimiter;
pub use rate_limiter::RateLimitDecision;
pub use router::ActorSettings;
pub use router::LedgerRouter;
pub use store::InMemoryLedgerStore;
pub use sweeper::RetentionSweeper;
pub use sweeper::SweepReport;
pub use usage::UsageLedger;
