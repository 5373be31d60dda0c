// crates/credit-ledger-core/src/core/outcome.rs
// ============================================================================
// Module: Credit Ledger Outcomes
// Description: Ledger commands, error codes, and the response envelope.
// Purpose: Carry business outcomes as values across the actor boundary.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every ledger command answers with a [`LedgerResponse`]: an HTTP-style
//! status, a JSON body, and optional rate-limit headers. Business rejections
//! (rate limiting, exhausted credit, missing operations) are ordinary
//! responses; only infrastructure failures surface as `INTERNAL`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::core::identifiers::OperationId;
use crate::core::identifiers::Tier;
use crate::core::identifiers::ToolName;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Command addressed to a single client's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRequest {
    /// Charge a tool invocation exactly once per operation id.
    Charge {
        /// Tier selecting the daily cap.
        tier: Tier,
        /// Tool being charged.
        tool: ToolName,
        /// Idempotency key.
        op_id: OperationId,
    },
    /// Reverse a previous successful charge.
    Refund {
        /// Tier echoed in the receipt.
        tier: Tier,
        /// Tool echoed in the receipt.
        tool: ToolName,
        /// Operation to reverse.
        op_id: OperationId,
    },
    /// Read today's usage.
    Status {
        /// Tier selecting the cap.
        tier: Tier,
    },
    /// Read per-day usage for recent days.
    History {
        /// Number of days, including today.
        days: u32,
    },
}

impl LedgerRequest {
    /// Returns a stable operation label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Charge {
                ..
            } => "charge",
            Self::Refund {
                ..
            } => "refund",
            Self::Status {
                ..
            } => "status",
            Self::History {
                ..
            } => "history",
        }
    }

}

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Stable error codes returned in `{ok:false, error:{code, message}}` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerErrorCode {
    /// Malformed or missing input.
    BadRequest,
    /// Tool is not in the configured cost table.
    InvalidTool,
    /// Operation id failed validation.
    InvalidOp,
    /// Rate window exhausted.
    RateLimited,
    /// Daily credit cap would be exceeded.
    CreditExhausted,
    /// Route or operation not found.
    NotFound,
    /// Shared secret missing or wrong.
    Forbidden,
    /// Storage or internal failure.
    Internal,
}

impl LedgerErrorCode {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidTool => "INVALID_TOOL",
            Self::InvalidOp => "INVALID_OP",
            Self::RateLimited => "RATE_LIMITED",
            Self::CreditExhausted => "CREDIT_EXHAUSTED",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal => "INTERNAL",
        }
    }

    /// Returns the HTTP status paired with the code.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::BadRequest | Self::InvalidTool | Self::InvalidOp => 400,
            Self::RateLimited => 429,
            Self::CreditExhausted => 402,
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::Internal => 500,
        }
    }
}

// ============================================================================
// SECTION: Rate-Limit Headers
// ============================================================================

/// Rate-limit metadata attached to charge responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `X-RateLimit-Limit`.
    pub limit: u64,
    /// `X-RateLimit-Remaining`.
    pub remaining: u64,
    /// `X-RateLimit-Reset` (epoch seconds).
    pub reset: u64,
    /// `Retry-After` seconds, only on rejection.
    pub retry_after: Option<u64>,
}

impl RateLimitHeaders {
    /// Returns header name/value pairs in emission order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset.to_string()),
        ];
        if let Some(retry_after) = self.retry_after {
            pairs.push(("Retry-After", retry_after.to_string()));
        }
        pairs
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Status, JSON body, and optional rate-limit headers for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerResponse {
    /// HTTP-style status.
    pub status: u16,
    /// JSON body.
    pub body: Value,
    /// Rate-limit metadata, present on charges that reached the limiter.
    pub rate_limit: Option<RateLimitHeaders>,
}

impl LedgerResponse {
    /// Builds a response from a raw status and body.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            rate_limit: None,
        }
    }

    /// Serializes a success payload into a 200 response.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when the payload cannot become JSON.
    pub fn ok<T: Serialize>(payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(200, serde_json::to_value(payload)?))
    }

    /// Builds an error response with the standard error body.
    #[must_use]
    pub fn error(code: LedgerErrorCode, message: impl Into<String>) -> Self {
        Self::new(
            code.http_status(),
            json!({
                "ok": false,
                "error": { "code": code.as_str(), "message": message.into() },
            }),
        )
    }

    /// Builds the `INTERNAL` response.
    #[must_use]
    pub fn internal() -> Self {
        Self::error(LedgerErrorCode::Internal, "internal error")
    }

    /// Attaches rate-limit headers.
    #[must_use]
    pub const fn with_rate_limit(mut self, headers: RateLimitHeaders) -> Self {
        self.rate_limit = Some(headers);
        self
    }

    /// Returns the error code carried in the body, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(|error| error.get("code")).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests;
