// crates/credit-ledger-core/src/runtime/rate_limiter.rs
// ============================================================================
// Module: Fixed-Window Rate Limiter
// Description: Per-client request counting over aligned time windows.
// Purpose: Bound charge attempts per window inside a ledger transaction.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Windows are aligned to multiples of the window length since the epoch, so
//! an instant exactly on a boundary starts a new window. Every attempt that
//! reaches the limiter increments the counter, including rejected ones; the
//! rejection is never rolled back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::RateLimitHeaders;
use crate::core::RateLimitPolicy;
use crate::core::Timestamp;
use crate::interfaces::LedgerTransaction;
use crate::interfaces::StoreError;
use crate::interfaces::StoredValue;
use crate::runtime::keys;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of one rate-limit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the attempt is within the limit.
    pub allowed: bool,
    /// Configured limit.
    pub limit: u64,
    /// Window count after this attempt.
    pub count: u64,
    /// `max(0, limit - count)`.
    pub remaining: u64,
    /// Epoch second at which the window ends.
    pub reset_at: u64,
    /// Seconds until the window ends, at least 1.
    pub retry_after: u64,
}

impl RateLimitDecision {
    /// Returns the response headers for this decision.
    #[must_use]
    pub const fn headers(&self) -> RateLimitHeaders {
        RateLimitHeaders {
            limit: self.limit,
            remaining: self.remaining,
            reset: self.reset_at,
            retry_after: if self.allowed { None } else { Some(self.retry_after) },
        }
    }
}

// ============================================================================
// SECTION: Limiter
// ============================================================================

/// Fixed-window limiter bound to one policy snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FixedWindowRateLimiter {
    /// Limit parameters.
    policy: RateLimitPolicy,
}

impl FixedWindowRateLimiter {
    /// Creates a limiter for the provided policy.
    #[must_use]
    pub const fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
        }
    }

    /// Returns the start (epoch seconds) of the window containing `now`.
    #[must_use]
    pub const fn window_start(&self, now: Timestamp) -> u64 {
        let window = self.window_seconds();
        (now.as_secs() / window) * window
    }

    /// Counts one attempt and decides whether it is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the window counter cannot be read or written.
    pub fn consume(
        &self,
        txn: &mut dyn LedgerTransaction,
        now: Timestamp,
    ) -> Result<RateLimitDecision, StoreError> {
        let window = self.window_seconds();
        let window_start = self.window_start(now);
        let reset_at = window_start.saturating_add(window);
        let key = keys::rate_window(window_start);

        let current = txn.get(&key)?.and_then(|value| value.as_counter()).unwrap_or(0);
        let count = current.saturating_add(1);
        let expires_at = Timestamp::from_secs(reset_at.saturating_add(self.policy.grace_seconds));
        txn.put(&key, StoredValue::counter(count), expires_at)?;

        Ok(RateLimitDecision {
            allowed: count <= self.policy.limit,
            limit: self.policy.limit,
            count,
            remaining: self.policy.limit.saturating_sub(count),
            reset_at,
            retry_after: reset_at.saturating_sub(now.as_secs()).max(1),
        })
    }

    /// Window length, never zero.
    const fn window_seconds(&self) -> u64 {
        if self.policy.window_seconds == 0 { 1 } else { self.policy.window_seconds }
    }
}

#[cfg(test)]
mod tests;
