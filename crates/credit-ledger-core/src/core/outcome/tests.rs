// crates/credit-ledger-core/src/core/outcome/tests.rs
// ============================================================================
// Module: Outcome Unit Tests
// Description: Error envelope shape and header emission.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use serde_json::json;

use super::LedgerErrorCode;
use super::LedgerResponse;
use super::RateLimitHeaders;

#[test]
fn error_body_has_code_and_message() {
    let response = LedgerResponse::error(LedgerErrorCode::NotFound, "missing");
    assert_eq!(response.status, 404);
    assert_eq!(
        response.body,
        json!({"ok": false, "error": {"code": "NOT_FOUND", "message": "missing"}})
    );
    assert_eq!(response.error_code(), Some("NOT_FOUND"));
    assert_eq!(response.status, 404);
}

#[test]
fn status_codes_match_error_classes() {
    assert_eq!(LedgerErrorCode::InvalidOp.http_status(), 400);
    assert_eq!(LedgerErrorCode::RateLimited.http_status(), 429);
    assert_eq!(LedgerErrorCode::CreditExhausted.http_status(), 402);
    assert_eq!(LedgerErrorCode::Forbidden.http_status(), 403);
    assert_eq!(LedgerErrorCode::Internal.http_status(), 500);
}

#[test]
fn retry_after_only_when_rejected() {
    let allowed = RateLimitHeaders {
        limit: 5,
        remaining: 2,
        reset: 120,
        retry_after: None,
    };
    let names: Vec<&str> = allowed.pairs().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["X-RateLimit-Limit", "X-RateLimit-Remaining", "X-RateLimit-Reset"]);

    let rejected = RateLimitHeaders {
        retry_after: Some(7),
        ..allowed
    };
    assert_eq!(rejected.pairs().last().cloned(), Some(("Retry-After", "7".to_string())));
}
