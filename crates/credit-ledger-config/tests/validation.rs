//! Config validation tests for credit-ledger-config.
// crates/credit-ledger-config/tests/validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate section constraints and fail-closed defaults.
// Purpose: Ensure invalid ledger settings are rejected before startup.
// =============================================================================

use credit_ledger_config::ConfigError;
use credit_ledger_config::CreditLedgerConfig;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CreditLedgerConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

fn parse(extra: &str) -> Result<CreditLedgerConfig, ConfigError> {
    CreditLedgerConfig::from_toml_str(&format!("[server]\ndev_permissive = true\n\n{extra}"))
}

#[test]
fn missing_secret_is_rejected() -> TestResult {
    assert_invalid(CreditLedgerConfig::from_toml_str(""), "requires internal_secret")
}

#[test]
fn short_secret_is_rejected() -> TestResult {
    assert_invalid(
        CreditLedgerConfig::from_toml_str("[server]\ninternal_secret = \"short\"\n"),
        "internal secret must be",
    )
}

#[test]
fn both_secret_sources_are_rejected() -> TestResult {
    assert_invalid(
        CreditLedgerConfig::from_toml_str(
            "[server]\ninternal_secret = \"0123456789abcdef\"\ninternal_secret_env = \"X\"\n",
        ),
        "set only one of",
    )
}

#[test]
fn unset_secret_env_is_rejected() -> TestResult {
    assert_invalid(
        CreditLedgerConfig::from_toml_str(
            "[server]\ninternal_secret_env = \"CREDIT_LEDGER_TEST_SECRET_NEVER_SET\"\n",
        ),
        "is not set",
    )
}

#[test]
fn inline_secret_resolves() -> TestResult {
    let config = CreditLedgerConfig::from_toml_str(
        "[server]\ninternal_secret = \"0123456789abcdef\"\n",
    )
    .map_err(|err| err.to_string())?;
    let secret = config.server.resolve_secret().map_err(|err| err.to_string())?;
    if secret.as_deref() != Some("0123456789abcdef") {
        return Err("inline secret should resolve".to_string());
    }
    Ok(())
}

#[test]
fn bad_bind_is_rejected() -> TestResult {
    assert_invalid(
        CreditLedgerConfig::from_toml_str("[server]\ndev_permissive = true\nbind = \"nowhere\"\n"),
        "not a socket address",
    )
}

#[test]
fn oversized_body_limit_is_rejected() -> TestResult {
    assert_invalid(
        CreditLedgerConfig::from_toml_str(
            "[server]\ndev_permissive = true\nmax_body_bytes = 2000000\n",
        ),
        "server.max_body_bytes",
    )
}

#[test]
fn unknown_fields_are_rejected() -> TestResult {
    assert_invalid(parse("[credits]\nfree_cap = 10\n"), "unknown field")
}

#[test]
fn zero_caps_are_rejected() -> TestResult {
    assert_invalid(parse("[credits]\nfree_daily = 0\n"), "daily caps must be positive")
}

#[test]
fn zero_tool_cost_is_rejected() -> TestResult {
    assert_invalid(parse("[credits.tool_costs]\nsummarize = 0\n"), "must be positive")
}

#[test]
fn zero_rate_limit_is_rejected() -> TestResult {
    assert_invalid(parse("[rate_limit]\nlimit = 0\n"), "rate_limit.limit")
}

#[test]
fn short_usage_retention_is_rejected() -> TestResult {
    assert_invalid(parse("[retention]\nusage_retention_days = 7\n"), "at least 30")
}

#[test]
fn zero_sweep_batch_is_rejected() -> TestResult {
    assert_invalid(parse("[retention]\nsweep_batch_size = 0\n"), "sweep_batch_size")
}

#[test]
fn mailbox_bounds_are_enforced() -> TestResult {
    assert_invalid(parse("[actors]\nmailbox_capacity = 0\n"), "actors.mailbox_capacity")?;
    assert_invalid(parse("[actors]\nmailbox_capacity = 5000\n"), "actors.mailbox_capacity")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    assert_invalid(parse("[store]\ntype = \"sqlite\"\n"), "sqlite store requires path")
}

#[test]
fn memory_store_rejects_path() -> TestResult {
    assert_invalid(
        parse("[store]\ntype = \"memory\"\npath = \"ledger.db\"\n"),
        "memory store must not set path",
    )
}

#[test]
fn file_audit_requires_path() -> TestResult {
    assert_invalid(parse("[audit]\nsink = \"file\"\n"), "requires audit.path")
}

#[test]
fn audit_path_without_file_sink_is_rejected() -> TestResult {
    assert_invalid(
        parse("[audit]\nsink = \"stderr\"\npath = \"audit.jsonl\"\n"),
        "only valid with the file sink",
    )
}
