// crates/credit-ledger-core/src/core/policy/tests.rs
// ============================================================================
// Module: Policy Unit Tests
// Description: Cost and cap lookups plus validation.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use super::LedgerPolicy;
use super::TierCapTable;
use super::ToolCostTable;
use crate::core::identifiers::Tier;
use crate::core::identifiers::ToolName;

#[test]
fn missing_tool_costs_one() {
    let table = ToolCostTable::new([(ToolName::new("summarize"), 5)]);
    assert_eq!(table.cost_of(&ToolName::new("summarize")), 5);
    assert_eq!(table.cost_of(&ToolName::new("translate")), 1);
    assert!(table.contains(&ToolName::new("summarize")));
    assert!(!table.contains(&ToolName::new("translate")));
}

#[test]
fn caps_follow_tier() {
    let caps = TierCapTable::default();
    assert_eq!(caps.cap_for(Tier::Free), 20);
    assert_eq!(caps.cap_for(Tier::Pro), 200);
    assert_eq!(caps.cap_for(Tier::from_label_or_free("enterprise")), 20);
}

#[test]
fn default_policy_validates() {
    LedgerPolicy::default().validate().expect("default policy");
}

#[test]
fn validate_rejects_zero_values() {
    let mut policy = LedgerPolicy::default();
    policy.tier_caps.free = 0;
    assert!(policy.validate().is_err());

    let mut policy = LedgerPolicy::default();
    policy.rate_limit.window_seconds = 0;
    assert!(policy.validate().is_err());

    let mut policy = LedgerPolicy::default();
    policy.tool_costs = ToolCostTable::new([(ToolName::new("free-lunch"), 0)]);
    let err = policy.validate().unwrap_err();
    assert!(err.to_string().contains("free-lunch"));
}

#[test]
fn with_version_preserves_limits() {
    let policy = LedgerPolicy::default().with_version(7);
    assert_eq!(policy.version, 7);
    assert_eq!(policy.rate_limit, LedgerPolicy::default().rate_limit);
}
