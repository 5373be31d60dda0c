// crates/credit-ledger-server/src/lib.rs
// ============================================================================
// Module: Credit Ledger Server Library
// Description: Internal RPC surface for the credit ledger.
// Purpose: Expose charge, refund, status, and history over HTTP.
// Dependencies: credit-ledger-core, credit-ledger-config, axum, tokio
// ============================================================================

//! ## Overview
//! `credit-ledger-server` binds the per-client ledger router to an axum HTTP
//! surface guarded by a shared secret. It is meant to sit behind a trusted
//! gateway, never on a public interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod rpc;
pub mod security;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use server::LedgerServer;
pub use server::SECRET_HEADER;
pub use server::ServerError;
