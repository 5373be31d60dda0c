// crates/credit-ledger-core/src/core/records.rs
// ============================================================================
// Module: Credit Ledger Records
// Description: Persisted operation records and success payloads.
// Purpose: Define the stable JSON bodies returned for ledger operations.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Success payloads use camelCase field names so they can be returned to the
//! gateway verbatim. An [`OperationRecord`] keeps the exact status and body of
//! the first successful charge, alongside the bookkeeping a refund needs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::calendar::DayKey;
use crate::core::calendar::Timestamp;
use crate::core::identifiers::ClientId;
use crate::core::identifiers::Tier;
use crate::core::identifiers::ToolName;

// ============================================================================
// SECTION: Operation Record
// ============================================================================

/// Cached outcome of a successful charge, keyed by operation identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// HTTP status of the original response.
    pub status: u16,
    /// Original response body, replayed verbatim.
    pub body: Value,
    /// Tool that was charged.
    pub tool: ToolName,
    /// Credits charged.
    pub cost: u64,
    /// Instant of the charge.
    pub charged_at: Timestamp,
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Body of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeReceipt {
    /// Always true.
    pub ok: bool,
    /// Credits used today after the charge.
    pub used: u64,
    /// Credits left today.
    pub remaining: u64,
    /// Daily cap for the tier.
    pub limit: u64,
    /// Tier the cap was taken from.
    pub tier: Tier,
    /// Charged tool.
    pub tool: ToolName,
    /// Credits charged.
    pub cost: u64,
}

/// Body of a successful refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    /// Always true.
    pub ok: bool,
    /// Credits returned.
    pub refunded: u64,
    /// Tool named by the refund request.
    pub tool: ToolName,
    /// Tier named by the refund request.
    pub tier: Tier,
    /// Credits used today after the refund.
    pub new_used: u64,
}

/// Body of a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Always true.
    pub ok: bool,
    /// Credits left today.
    pub remaining: u64,
    /// Daily cap for the tier.
    pub limit: u64,
    /// Tier the cap was taken from.
    pub tier: Tier,
    /// Credits used today.
    pub used: u64,
    /// Today's day key.
    pub day: DayKey,
}

/// Body of a history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    /// Always true.
    pub ok: bool,
    /// Client the history belongs to.
    pub client_id: ClientId,
    /// Credits used per day key; absent days report 0.
    pub history: BTreeMap<String, u64>,
}
