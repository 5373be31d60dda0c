// crates/credit-ledger-core/src/core/policy.rs
// ============================================================================
// Module: Credit Ledger Policy
// Description: Versioned pricing, cap, rate-limit, and retention snapshot.
// Purpose: Thread one immutable configuration view into every ledger command.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`LedgerPolicy`] is an explicit snapshot: the router hands the current
//! `Arc<LedgerPolicy>` to each command and actors never retain it, so a
//! reloaded policy applies to the very next request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::Tier;
use crate::core::identifiers::ToolName;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default daily credit cap for the free tier.
pub const DEFAULT_FREE_CAP: u64 = 20;
/// Default daily credit cap for the pro tier.
pub const DEFAULT_PRO_CAP: u64 = 200;
/// Cost charged for tools absent from the cost table.
pub const DEFAULT_TOOL_COST: u64 = 1;
/// Default requests allowed per rate window.
pub const DEFAULT_RATE_LIMIT: u64 = 60;
/// Default rate window length in seconds.
pub const DEFAULT_RATE_WINDOW_SECONDS: u64 = 60;
/// Default grace period added to rate window expiry.
pub const DEFAULT_RATE_GRACE_SECONDS: u64 = 5;
/// Default operation record lifetime (2 days).
pub const DEFAULT_OPERATION_TTL_SECONDS: u64 = 172_800;
/// Default number of past days of usage retained.
pub const DEFAULT_USAGE_RETENTION_DAYS: u32 = 31;
/// Default upper bound of keys deleted per sweep.
pub const DEFAULT_SWEEP_BATCH_SIZE: usize = 256;
/// Maximum number of days a history query may cover.
pub const MAX_HISTORY_DAYS: u32 = 30;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A field holds an unusable value.
    #[error("invalid policy: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Tool to credit cost mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCostTable(BTreeMap<ToolName, u64>);

impl ToolCostTable {
    /// Builds a table from `(tool, cost)` pairs.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (ToolName, u64)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Returns the cost of a tool, defaulting to [`DEFAULT_TOOL_COST`].
    #[must_use]
    pub fn cost_of(&self, tool: &ToolName) -> u64 {
        match self.0.get(tool) {
            Some(cost) if *cost > 0 => *cost,
            _ => DEFAULT_TOOL_COST,
        }
    }

    /// Returns true when the tool has an explicit entry.
    #[must_use]
    pub fn contains(&self, tool: &ToolName) -> bool {
        self.0.contains_key(tool)
    }

    /// Returns true when no tools are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates configured entries in tool-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ToolName, u64)> {
        self.0.iter().map(|(tool, cost)| (tool, *cost))
    }
}

/// Daily credit caps by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCapTable {
    /// Free tier cap.
    pub free: u64,
    /// Pro tier cap.
    pub pro: u64,
}

impl TierCapTable {
    /// Returns the cap for a tier.
    #[must_use]
    pub const fn cap_for(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Free => self.free,
            Tier::Pro => self.pro,
        }
    }
}

impl Default for TierCapTable {
    fn default() -> Self {
        Self {
            free: DEFAULT_FREE_CAP,
            pro: DEFAULT_PRO_CAP,
        }
    }
}

/// Fixed-window rate limit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Requests allowed per window.
    pub limit: u64,
    /// Window length in seconds.
    pub window_seconds: u64,
    /// Extra seconds a window counter outlives its window.
    pub grace_seconds: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RATE_LIMIT,
            window_seconds: DEFAULT_RATE_WINDOW_SECONDS,
            grace_seconds: DEFAULT_RATE_GRACE_SECONDS,
        }
    }
}

/// Retention and sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Lifetime of an operation record in seconds.
    pub operation_ttl_seconds: u64,
    /// Number of past days whose usage stays readable.
    pub usage_retention_days: u32,
    /// Maximum keys deleted by one sweep.
    pub sweep_batch_size: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            operation_ttl_seconds: DEFAULT_OPERATION_TTL_SECONDS,
            usage_retention_days: DEFAULT_USAGE_RETENTION_DAYS,
            sweep_batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Immutable, versioned ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerPolicy {
    /// Monotonic snapshot version.
    pub version: u64,
    /// Tool pricing.
    pub tool_costs: ToolCostTable,
    /// Daily caps.
    pub tier_caps: TierCapTable,
    /// Rate limit.
    pub rate_limit: RateLimitPolicy,
    /// Retention.
    pub retention: RetentionPolicy,
}

impl LedgerPolicy {
    /// Returns the cost of a tool under this policy.
    #[must_use]
    pub fn cost_of(&self, tool: &ToolName) -> u64 {
        self.tool_costs.cost_of(tool)
    }

    /// Returns the daily cap for a tier under this policy.
    #[must_use]
    pub const fn cap_for(&self, tier: Tier) -> u64 {
        self.tier_caps.cap_for(tier)
    }

    /// Returns a copy with a different version number.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Validates that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Invalid`] for zero caps, zero rate parameters,
    /// zero tool costs, or a zero sweep batch.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.tier_caps.free == 0 || self.tier_caps.pro == 0 {
            return Err(PolicyError::Invalid("tier caps must be positive".to_string()));
        }
        if self.rate_limit.limit == 0 {
            return Err(PolicyError::Invalid("rate limit must be positive".to_string()));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(PolicyError::Invalid("rate window must be positive".to_string()));
        }
        if let Some((tool, _)) = self.tool_costs.iter().find(|(_, cost)| *cost == 0) {
            return Err(PolicyError::Invalid(format!("tool cost for {tool} must be positive")));
        }
        if self.retention.operation_ttl_seconds == 0 {
            return Err(PolicyError::Invalid("operation ttl must be positive".to_string()));
        }
        if self.retention.sweep_batch_size == 0 {
            return Err(PolicyError::Invalid("sweep batch size must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
