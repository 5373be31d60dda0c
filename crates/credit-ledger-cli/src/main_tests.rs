// crates/credit-ledger-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Argument parsing and config commands.
// Purpose: Ensure subcommands parse and config checks fail closed.
// Dependencies: credit-ledger-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Exercises the clap surface and the non-serving commands.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use credit_ledger_config::CreditLedgerConfig;
use credit_ledger_config::config_toml_example;
use tempfile::TempDir;

use super::Cli;
use super::Commands;
use super::ConfigArgs;
use super::ConfigCommand;
use super::command_config_check;
use super::config_summary;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn serve_accepts_config_path() {
    let cli = Cli::try_parse_from(["credit-ledger", "serve", "--config", "ledger.toml"]).unwrap();
    let Some(Commands::Serve(args)) = cli.command else {
        panic!("expected serve command");
    };
    assert_eq!(args.config, Some(PathBuf::from("ledger.toml")));
}

#[test]
fn config_subcommands_parse() {
    let cli = Cli::try_parse_from(["credit-ledger", "config", "example"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommand::Example
        })
    ));
    let cli = Cli::try_parse_from(["credit-ledger", "config", "check"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommand::Check(ConfigArgs {
                config: None
            })
        })
    ));
    assert!(Cli::try_parse_from(["credit-ledger", "config", "apply"]).is_err());
}

#[test]
fn config_check_accepts_example_and_rejects_invalid() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, config_toml_example()).unwrap();
    assert!(
        command_config_check(&ConfigArgs {
            config: Some(good)
        })
        .is_ok()
    );

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[server]\nbind = \"127.0.0.1:8787\"\n").unwrap();
    let err = command_config_check(&ConfigArgs {
        config: Some(bad),
    })
    .unwrap_err();
    assert!(err.to_string().contains("requires internal_secret"), "unexpected error: {err}");
}

#[test]
fn summary_names_store_and_limits() {
    let config = CreditLedgerConfig::from_toml_str(&config_toml_example()).unwrap();
    let summary = config_summary(&config);
    assert!(summary.starts_with("config ok: bind=127.0.0.1:8787 free=20 pro=200 tools=3"));
    assert!(summary.ends_with("store=sqlite (credit-ledger.db)"));
}
