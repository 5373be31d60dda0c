// crates/credit-ledger-config/src/lib.rs
// ============================================================================
// Module: Credit Ledger Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for credit-ledger.toml semantics.
// Dependencies: credit-ledger-core, credit-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `credit-ledger-config` defines the configuration model for the credit
//! ledger service. Loading is strict and fail-closed: unknown fields, zero
//! limits, and a missing shared secret without `dev_permissive` are rejected
//! before the server starts.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
