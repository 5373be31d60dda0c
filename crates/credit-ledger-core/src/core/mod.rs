// crates/credit-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Credit Ledger Core Types
// Description: Canonical identifiers, time, policy, records, and responses.
// Purpose: Provide stable, serializable types shared by every ledger surface.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types define the client-scoped identifiers, the UTC calendar, the
//! versioned pricing/limit policy, persisted operation records, and the
//! response envelope returned across the ledger boundary.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod calendar;
pub mod identifiers;
pub mod outcome;
pub mod policy;
pub mod records;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use calendar::Clock;
pub use calendar::DayKey;
pub use calendar::ManualClock;
pub use calendar::SECONDS_PER_DAY;
pub use calendar::SystemClock;
pub use calendar::Timestamp;
pub use identifiers::ClientId;
pub use identifiers::IdentifierError;
pub use identifiers::OperationId;
pub use identifiers::Tier;
pub use identifiers::ToolName;
pub use outcome::LedgerErrorCode;
pub use outcome::LedgerRequest;
pub use outcome::LedgerResponse;
pub use outcome::RateLimitHeaders;
pub use policy::LedgerPolicy;
pub use policy::MAX_HISTORY_DAYS;
pub use policy::PolicyError;
pub use policy::RateLimitPolicy;
pub use policy::RetentionPolicy;
pub use policy::TierCapTable;
pub use policy::ToolCostTable;
pub use records::ChargeReceipt;
pub use records::HistoryReport;
pub use records::OperationRecord;
pub use records::RefundReceipt;
pub use records::StatusReport;
