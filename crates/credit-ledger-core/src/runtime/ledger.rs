// crates/credit-ledger-core/src/runtime/ledger.rs
// ============================================================================
// Module: Client Ledger
// Description: Charge, refund, status, and history for one client.
// Purpose: Compose limiter, usage, idempotency, and sweep into atomic commands.
// Dependencies: crate::{core, interfaces, runtime}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ClientLedger`] executes one command synchronously against one client's
//! partition. Charge and refund run inside a single store transaction that
//! is committed once, so daily usage and operation records never diverge.
//! Status and history read through a transaction that is dropped without
//! committing.
//!
//! Charge order: sweep, idempotent replay, rate limit, credit cap, then the
//! usage update and record write. A replay touches neither the limiter nor
//! usage. An exhausted charge is never recorded, so the same operation id
//! can succeed once credit becomes available.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::core::ChargeReceipt;
use crate::core::ClientId;
use crate::core::Clock;
use crate::core::DayKey;
use crate::core::HistoryReport;
use crate::core::LedgerErrorCode;
use crate::core::LedgerPolicy;
use crate::core::LedgerRequest;
use crate::core::LedgerResponse;
use crate::core::OperationId;
use crate::core::OperationRecord;
use crate::core::RefundReceipt;
use crate::core::StatusReport;
use crate::core::Tier;
use crate::core::Timestamp;
use crate::core::ToolName;
use crate::interfaces::LedgerStore;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::runtime::idempotency::IdempotencyStore;
use crate::runtime::rate_limiter::FixedWindowRateLimiter;
use crate::runtime::sweeper::RetentionSweeper;
use crate::runtime::sweeper::SweepReport;
use crate::runtime::usage::UsageLedger;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Infrastructure failures while executing a command.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A payload could not be serialized.
    #[error("ledger serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Response plus side information produced by one command.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerOutcome {
    /// Response for the caller.
    pub response: LedgerResponse,
    /// Sweep summary when the command ran the daily sweep.
    pub sweep: Option<SweepReport>,
}

// ============================================================================
// SECTION: Client Ledger
// ============================================================================

/// Command executor for one client partition.
pub struct ClientLedger {
    /// Partition owner.
    client_id: ClientId,
    /// Backing store.
    store: Arc<dyn LedgerStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl ClientLedger {
    /// Creates a ledger for a client.
    #[must_use]
    pub fn new(client_id: ClientId, store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client_id,
            store,
            clock,
        }
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Executes one command under the provided policy snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on storage or serialization failure; no state
    /// is changed in that case.
    pub fn execute(
        &self,
        policy: &LedgerPolicy,
        request: &LedgerRequest,
    ) -> Result<LedgerOutcome, LedgerError> {
        let now = self.clock.now();
        let today = DayKey::from_timestamp(now);
        match request {
            LedgerRequest::Charge {
                tier,
                tool,
                op_id,
            } => self.mutate(now, today, policy, |txn| {
                charge(txn, policy, now, today, *tier, tool, op_id)
            }),
            LedgerRequest::Refund {
                tier,
                op_id,
                ..
            } => self.mutate(now, today, policy, |txn| {
                refund(txn, policy, today, *tier, op_id)
            }),
            LedgerRequest::Status {
                tier,
            } => {
                let mut txn = self.store.begin(&self.client_id, now)?;
                let used = UsageLedger::new(policy.retention).used(txn.as_mut(), today)?;
                let limit = policy.cap_for(*tier);
                let response = LedgerResponse::ok(&StatusReport {
                    ok: true,
                    remaining: limit.saturating_sub(used),
                    limit,
                    tier: *tier,
                    used,
                    day: today,
                })?;
                Ok(LedgerOutcome {
                    response,
                    sweep: None,
                })
            }
            LedgerRequest::History {
                days,
            } => {
                let mut txn = self.store.begin(&self.client_id, now)?;
                let history =
                    UsageLedger::new(policy.retention).history(txn.as_mut(), today, *days)?;
                let response = LedgerResponse::ok(&HistoryReport {
                    ok: true,
                    client_id: self.client_id.clone(),
                    history,
                })?;
                Ok(LedgerOutcome {
                    response,
                    sweep: None,
                })
            }
        }
    }

    /// Runs the daily sweep and a mutating command in one committed transaction.
    fn mutate<F>(
        &self,
        now: Timestamp,
        today: DayKey,
        policy: &LedgerPolicy,
        command: F,
    ) -> Result<LedgerOutcome, LedgerError>
    where
        F: FnOnce(&mut dyn LedgerTransaction) -> Result<LedgerResponse, LedgerError>,
    {
        let mut txn = self.store.begin(&self.client_id, now)?;
        let sweep = RetentionSweeper::new(policy.retention).run(txn.as_mut(), today)?;
        let response = command(txn.as_mut())?;
        txn.commit()?;
        Ok(LedgerOutcome {
            response,
            sweep,
        })
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Charges a tool once per operation id.
fn charge(
    txn: &mut dyn LedgerTransaction,
    policy: &LedgerPolicy,
    now: Timestamp,
    today: DayKey,
    tier: Tier,
    tool: &ToolName,
    op_id: &OperationId,
) -> Result<LedgerResponse, LedgerError> {
    let idempotency = IdempotencyStore::new(policy.retention);
    if let Some(record) = idempotency.lookup(txn, op_id)? {
        return Ok(LedgerResponse::new(record.status, record.body));
    }

    let decision = FixedWindowRateLimiter::new(policy.rate_limit).consume(txn, now)?;
    if !decision.allowed {
        return Ok(LedgerResponse::error(LedgerErrorCode::RateLimited, "Too many requests")
            .with_rate_limit(decision.headers()));
    }

    let usage = UsageLedger::new(policy.retention);
    let cost = policy.cost_of(tool);
    let limit = policy.cap_for(tier);
    let used = usage.used(txn, today)?;
    let new_used = used.saturating_add(cost);
    if new_used > limit {
        let body = json!({
            "ok": false,
            "error": {
                "code": LedgerErrorCode::CreditExhausted.as_str(),
                "message": "Daily credit limit reached",
            },
            "remaining": limit.saturating_sub(used),
            "limit": limit,
            "tier": tier,
            "tool": tool,
            "cost": cost,
        });
        return Ok(LedgerResponse::new(LedgerErrorCode::CreditExhausted.http_status(), body)
            .with_rate_limit(decision.headers()));
    }

    usage.set(txn, today, new_used)?;
    let response = LedgerResponse::ok(&ChargeReceipt {
        ok: true,
        used: new_used,
        remaining: limit - new_used,
        limit,
        tier,
        tool: tool.clone(),
        cost,
    })?;
    let record = OperationRecord {
        status: response.status,
        body: response.body.clone(),
        tool: tool.clone(),
        cost,
        charged_at: now,
    };
    idempotency.insert(txn, op_id, record)?;
    Ok(response.with_rate_limit(decision.headers()))
}

/// Reverses a successful charge against today's usage.
fn refund(
    txn: &mut dyn LedgerTransaction,
    policy: &LedgerPolicy,
    today: DayKey,
    tier: Tier,
    op_id: &OperationId,
) -> Result<LedgerResponse, LedgerError> {
    let idempotency = IdempotencyStore::new(policy.retention);
    let record = match idempotency.lookup(txn, op_id)? {
        Some(record) if record.status == 200 => record,
        _ => {
            return Ok(LedgerResponse::error(
                LedgerErrorCode::NotFound,
                "No successful operation found for this opId",
            ));
        }
    };

    let new_used = UsageLedger::new(policy.retention).subtract_clamped(txn, today, record.cost)?;
    idempotency.remove(txn, op_id)?;
    Ok(LedgerResponse::ok(&RefundReceipt {
        ok: true,
        refunded: record.cost,
        tool: record.tool,
        tier,
        new_used,
    })?)
}
