// crates/credit-ledger-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for operators and tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The canonical `credit-ledger.toml`. Output is deterministic and must
//! always pass [`crate::CreditLedgerConfig::from_toml_str`].
//!
//! Security posture: the inline secret is a placeholder; deployments should
//! switch to `internal_secret_env`.

/// Returns a canonical example `credit-ledger.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:8787"
internal_secret = "replace-with-a-long-random-secret"
# internal_secret_env = "CREDIT_LEDGER_SECRET"
dev_permissive = false
max_body_bytes = 16384

[credits]
free_daily = 20
pro_daily = 200

[credits.tool_costs]
summarize = 1
translate = 2
generate_image = 5

[rate_limit]
limit = 60
window_seconds = 60
grace_seconds = 5

[retention]
operation_ttl_seconds = 172800
usage_retention_days = 31
sweep_batch_size = 256

[actors]
idle_timeout_ms = 60000
mailbox_capacity = 64

[store]
type = "sqlite"
path = "credit-ledger.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[audit]
sink = "stderr"
# sink = "file"
# path = "credit-ledger-audit.jsonl"
"#,
    )
}
