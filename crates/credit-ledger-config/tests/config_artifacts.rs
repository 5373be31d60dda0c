//! Config artifact tests for credit-ledger-config.
// crates/credit-ledger-config/tests/config_artifacts.rs
// ============================================================================
// Module: Config Artifact Tests
// Description: Validate the canonical example and default configuration.
// Purpose: Prevent drift between the config model and its example.
// Dependencies: credit-ledger-config, credit-ledger-core
// ============================================================================

use credit_ledger_config::AuditSinkType;
use credit_ledger_config::CreditLedgerConfig;
use credit_ledger_config::StoreType;
use credit_ledger_config::config_toml_example;
use credit_ledger_core::Tier;
use credit_ledger_core::ToolName;

type TestResult = Result<(), String>;

#[test]
fn example_config_validates() -> TestResult {
    let config =
        CreditLedgerConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Sqlite {
        return Err("example should use the sqlite store".to_string());
    }
    if config.store.sqlite_config().is_none() {
        return Err("example sqlite config should resolve".to_string());
    }
    if config.audit.sink != AuditSinkType::Stderr {
        return Err("example should audit to stderr".to_string());
    }
    Ok(())
}

#[test]
fn example_maps_to_policy() -> TestResult {
    let config =
        CreditLedgerConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    let policy = config.to_policy(7);
    if policy.version != 7 {
        return Err(format!("unexpected version {}", policy.version));
    }
    if policy.cost_of(&ToolName::new("generate_image")) != 5 {
        return Err("generate_image should cost 5".to_string());
    }
    if policy.cost_of(&ToolName::new("unlisted")) != 1 {
        return Err("unlisted tools should cost 1".to_string());
    }
    if policy.cap_for(Tier::Free) != 20 || policy.cap_for(Tier::Pro) != 200 {
        return Err("unexpected tier caps".to_string());
    }
    if policy.rate_limit.limit != 60 || policy.retention.usage_retention_days != 31 {
        return Err("unexpected limits".to_string());
    }
    Ok(())
}

#[test]
fn dev_permissive_minimal_config_uses_defaults() -> TestResult {
    let config = CreditLedgerConfig::from_toml_str("[server]\ndev_permissive = true\n")
        .map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Memory {
        return Err("default store should be memory".to_string());
    }
    if config.store.sqlite_config().is_some() {
        return Err("memory store should not produce sqlite config".to_string());
    }
    let addr = config.server.bind_addr().map_err(|err| err.to_string())?;
    if addr.port() != 8787 {
        return Err(format!("unexpected default port {}", addr.port()));
    }
    let settings = config.actors.settings();
    if settings.idle_timeout.as_millis() != 60_000 || settings.mailbox_capacity != 64 {
        return Err("unexpected actor defaults".to_string());
    }
    if config.server.resolve_secret().map_err(|err| err.to_string())?.is_some() {
        return Err("no secret should resolve".to_string());
    }
    Ok(())
}
