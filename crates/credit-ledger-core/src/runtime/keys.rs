// crates/credit-ledger-core/src/runtime/keys.rs
// ============================================================================
// Module: Ledger Keys
// Description: Key layout inside a client's partition.
// Dependencies: crate::core
// ============================================================================

//! Keys are scoped to one client partition, so none of them embed the
//! client identifier.

use crate::core::DayKey;
use crate::core::OperationId;

/// Prefix of rate window counters.
pub const RATE_WINDOW_PREFIX: &str = "rl::";
/// Prefix of daily usage counters.
pub const USAGE_PREFIX: &str = "used::";
/// Prefix of operation records.
pub const OPERATION_PREFIX: &str = "op::";
/// Prefix of sweep markers.
pub const CLEANUP_PREFIX: &str = "cleanup::";

/// Counter key for the window starting at `window_start` (epoch seconds).
#[must_use]
pub fn rate_window(window_start: u64) -> String {
    format!("{RATE_WINDOW_PREFIX}{window_start}")
}

/// Usage counter key for a day.
#[must_use]
pub fn usage(day: DayKey) -> String {
    format!("{USAGE_PREFIX}{day}")
}

/// Operation record key.
#[must_use]
pub fn operation(op_id: &OperationId) -> String {
    format!("{OPERATION_PREFIX}{op_id}")
}

/// Sweep marker key for a day.
#[must_use]
pub fn cleanup(day: DayKey) -> String {
    format!("{CLEANUP_PREFIX}{day}")
}
