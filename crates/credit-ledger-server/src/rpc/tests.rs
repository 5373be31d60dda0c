// crates/credit-ledger-server/src/rpc/tests.rs
// ============================================================================
// Module: RPC Parsing Unit Tests
// Description: Validation order and defaults for RPC inputs.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions are permitted."
)]

use std::collections::HashMap;

use credit_ledger_core::LedgerPolicy;
use credit_ledger_core::LedgerRequest;
use credit_ledger_core::LedgerResponse;
use credit_ledger_core::Tier;
use credit_ledger_core::ToolCostTable;
use credit_ledger_core::ToolName;

use super::MutationKind;
use super::parse_history;
use super::parse_operation;
use super::parse_status;

fn priced_policy() -> LedgerPolicy {
    LedgerPolicy {
        tool_costs: ToolCostTable::new([(ToolName::new("summarize"), 2)]),
        ..LedgerPolicy::default()
    }
}

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

fn code(result: Result<impl Sized, LedgerResponse>) -> String {
    match result {
        Err(response) => response.error_code().unwrap_or_default().to_string(),
        Ok(_) => panic!("expected an error response"),
    }
}

#[test]
fn charge_body_parses_with_trimmed_op_id() {
    let body = br#"{"clientId":"user-1","tier":"pro","tool":"summarize","opId":"  op_1  "}"#;
    let (client, request) =
        parse_operation(MutationKind::Charge, &priced_policy(), body).unwrap();
    assert_eq!(client.as_str(), "user-1");
    let LedgerRequest::Charge {
        tier,
        tool,
        op_id,
    } = request
    else {
        panic!("expected charge");
    };
    assert_eq!(tier, Tier::Pro);
    assert_eq!(tool.as_str(), "summarize");
    assert_eq!(op_id.as_str(), "op_1");
}

#[test]
fn refund_body_maps_to_refund() {
    let body = br#"{"clientId":"user-1","tool":"summarize","opId":"op-1"}"#;
    let (_, request) = parse_operation(MutationKind::Refund, &priced_policy(), body).unwrap();
    assert!(matches!(request, LedgerRequest::Refund { tier: Tier::Free, .. }));
}

#[test]
fn malformed_or_incomplete_bodies_are_bad_requests() {
    let policy = priced_policy();
    assert_eq!(code(parse_operation(MutationKind::Charge, &policy, b"not json")), "BAD_REQUEST");
    assert_eq!(code(parse_operation(MutationKind::Charge, &policy, b"{}")), "BAD_REQUEST");
    assert_eq!(
        code(parse_operation(
            MutationKind::Charge,
            &policy,
            br#"{"clientId":" ","tool":"summarize","opId":"a"}"#
        )),
        "BAD_REQUEST"
    );
    assert_eq!(
        code(parse_operation(
            MutationKind::Charge,
            &policy,
            br#"{"clientId":"c","tool":5,"opId":"a"}"#
        )),
        "BAD_REQUEST"
    );
}

#[test]
fn unknown_tool_is_rejected_only_with_a_cost_table() {
    let body = br#"{"clientId":"c","tool":"mystery","opId":"a"}"#;
    assert_eq!(
        code(parse_operation(MutationKind::Charge, &priced_policy(), body)),
        "INVALID_TOOL"
    );
    assert!(parse_operation(MutationKind::Charge, &LedgerPolicy::default(), body).is_ok());
}

#[test]
fn bad_op_id_is_rejected() {
    let policy = priced_policy();
    assert_eq!(
        code(parse_operation(
            MutationKind::Charge,
            &policy,
            br#"{"clientId":"c","tool":"summarize","opId":"has space"}"#
        )),
        "INVALID_OP"
    );
    let long = format!(r#"{{"clientId":"c","tool":"summarize","opId":"{}"}}"#, "a".repeat(65));
    assert_eq!(
        code(parse_operation(MutationKind::Charge, &policy, long.as_bytes())),
        "INVALID_OP"
    );
}

#[test]
fn unknown_tier_falls_back_to_free() {
    let policy = priced_policy();
    let (_, request) = parse_operation(
        MutationKind::Charge,
        &policy,
        br#"{"clientId":"c","tier":"enterprise","tool":"summarize","opId":"a"}"#,
    )
    .unwrap();
    assert!(matches!(request, LedgerRequest::Charge { tier: Tier::Free, .. }));
    let (_, request) = parse_operation(
        MutationKind::Refund,
        &policy,
        br#"{"clientId":"c","tier":"gold","tool":"summarize","opId":"a"}"#,
    )
    .unwrap();
    assert!(matches!(request, LedgerRequest::Refund { tier: Tier::Free, .. }));
}

#[test]
fn status_defaults_to_free_tier() {
    let (client, request) = parse_status(&query(&[("clientId", "c")])).unwrap();
    assert_eq!(client.as_str(), "c");
    assert_eq!(
        request,
        LedgerRequest::Status {
            tier: Tier::Free
        }
    );
    assert_eq!(code(parse_status(&query(&[]))), "BAD_REQUEST");
    let (_, request) = parse_status(&query(&[("clientId", "c"), ("tier", "x")])).unwrap();
    assert_eq!(
        request,
        LedgerRequest::Status {
            tier: Tier::Free
        }
    );
}

#[test]
fn history_days_default_cap_and_reject() {
    let days = |pairs: &[(&str, &str)]| match parse_history(&query(pairs)).unwrap().1 {
        LedgerRequest::History {
            days,
        } => days,
        other => panic!("unexpected request {other:?}"),
    };
    assert_eq!(days(&[("clientId", "c")]), 7);
    assert_eq!(days(&[("clientId", "c"), ("days", "2")]), 2);
    assert_eq!(days(&[("clientId", "c"), ("days", "365")]), 30);
    assert_eq!(code(parse_history(&query(&[("clientId", "c"), ("days", "0")]))), "BAD_REQUEST");
    assert_eq!(code(parse_history(&query(&[("clientId", "c"), ("days", "x")]))), "BAD_REQUEST");
    assert_eq!(code(parse_history(&query(&[("days", "3")]))), "BAD_REQUEST");
}
