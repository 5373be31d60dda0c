// crates/credit-ledger-server/src/rpc.rs
// ============================================================================
// Module: RPC Request Parsing
// Description: Validate raw RPC inputs into typed ledger requests.
// Purpose: Reject malformed input before it reaches a client actor.
// Dependencies: credit-ledger-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every parser returns either the target client and a typed
//! [`LedgerRequest`], or the error [`LedgerResponse`] to send back verbatim.
//! Checks run in a fixed order so callers see a stable error code for inputs
//! with several problems: required fields, then client id, then tool, then
//! operation id, then tier.
//!
//! Security posture: request bodies and query strings are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use credit_ledger_core::ClientId;
use credit_ledger_core::LedgerErrorCode;
use credit_ledger_core::LedgerPolicy;
use credit_ledger_core::LedgerRequest;
use credit_ledger_core::LedgerResponse;
use credit_ledger_core::MAX_HISTORY_DAYS;
use credit_ledger_core::OperationId;
use credit_ledger_core::Tier;
use credit_ledger_core::ToolName;
use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// History window when `days` is omitted.
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of parsing one RPC input.
pub type Parsed = Result<(ClientId, LedgerRequest), LedgerResponse>;

/// Which mutating command a body targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// `POST /consume`.
    Charge,
    /// `POST /refund`.
    Refund,
}

/// Loosely typed body for `/consume` and `/refund`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationBody {
    /// Client identifier.
    client_id: Option<String>,
    /// Tier label.
    tier: Option<String>,
    /// Tool name.
    tool: Option<String>,
    /// Operation id.
    op_id: Option<String>,
}

// ============================================================================
// SECTION: Parsers
// ============================================================================

/// Parses a `/consume` or `/refund` JSON body.
///
/// # Errors
///
/// Returns the error response for malformed or invalid input.
pub fn parse_operation(kind: MutationKind, policy: &LedgerPolicy, body: &[u8]) -> Parsed {
    let body: OperationBody = serde_json::from_slice(body).unwrap_or_default();
    let (Some(client), Some(tool), Some(op_id)) = (
        non_blank(body.client_id.as_deref()),
        non_blank(body.tool.as_deref()),
        non_blank(body.op_id.as_deref()),
    ) else {
        return Err(bad_request("clientId, tool, opId required"));
    };
    let client_id = parse_client(client)?;
    if !policy.tool_costs.is_empty() && !policy.tool_costs.contains(&ToolName::new(tool)) {
        return Err(LedgerResponse::error(
            LedgerErrorCode::InvalidTool,
            "Unknown or missing tool",
        ));
    }
    let op_id = OperationId::parse(op_id).map_err(|_| {
        LedgerResponse::error(LedgerErrorCode::InvalidOp, "Missing or invalid opId")
    })?;
    let tier = parse_tier(body.tier.as_deref());
    let tool = ToolName::new(tool);
    let request = match kind {
        MutationKind::Charge => LedgerRequest::Charge {
            tier,
            tool,
            op_id,
        },
        MutationKind::Refund => LedgerRequest::Refund {
            tier,
            tool,
            op_id,
        },
    };
    Ok((client_id, request))
}

/// Parses `/status` query parameters.
///
/// # Errors
///
/// Returns the error response for a missing client or unknown tier.
pub fn parse_status(query: &HashMap<String, String>) -> Parsed {
    let client_id = required_client(query)?;
    let tier = parse_tier(query.get("tier").map(String::as_str));
    Ok((
        client_id,
        LedgerRequest::Status {
            tier,
        },
    ))
}

/// Parses `/history` query parameters.
///
/// `days` defaults to 7 and is capped at 30; zero or non-numeric values are
/// rejected.
///
/// # Errors
///
/// Returns the error response for a missing client or invalid `days`.
pub fn parse_history(query: &HashMap<String, String>) -> Parsed {
    let client_id = required_client(query)?;
    let days = match query.get("days").map(|raw| raw.trim()) {
        None | Some("") => DEFAULT_HISTORY_DAYS,
        Some(raw) => match raw.parse::<u64>() {
            Ok(0) | Err(_) => return Err(bad_request("days must be a positive integer")),
            Ok(days) => u32::try_from(days.min(u64::from(MAX_HISTORY_DAYS)))
                .unwrap_or(MAX_HISTORY_DAYS),
        },
    };
    Ok((
        client_id,
        LedgerRequest::History {
            days,
        },
    ))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the trimmed value when present and non-empty.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Reads and validates the `clientId` query parameter.
fn required_client(query: &HashMap<String, String>) -> Result<ClientId, LedgerResponse> {
    let client = non_blank(query.get("clientId").map(String::as_str))
        .ok_or_else(|| bad_request("clientId required"))?;
    parse_client(client)
}

/// Validates a client identifier.
fn parse_client(value: &str) -> Result<ClientId, LedgerResponse> {
    ClientId::parse(value).map_err(|err| bad_request(err.to_string()))
}

/// Parses an optional tier label; absent or unrecognized means free.
fn parse_tier(label: Option<&str>) -> Tier {
    non_blank(label).map_or(Tier::Free, Tier::from_label_or_free)
}

/// Builds a `BAD_REQUEST` response.
fn bad_request(message: impl Into<String>) -> LedgerResponse {
    LedgerResponse::error(LedgerErrorCode::BadRequest, message)
}

#[cfg(test)]
mod tests;
