// crates/credit-ledger-server/src/security.rs
// ============================================================================
// Module: Server Security Helpers
// Description: Constant-time comparison utilities for the internal secret.
// Purpose: Keep secret checks free of early-exit timing differences.
// Dependencies: subtle
// ============================================================================

//! ## Overview
//! Constant-time equality for the `X-Internal-Secret` header.

use subtle::ConstantTimeEq;

// ============================================================================
// SECTION: Constant-Time Comparisons
// ============================================================================

/// Compares two byte slices in constant time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::constant_time_eq_str;

    #[test]
    fn equal_strings_match() {
        assert!(constant_time_eq_str("0123456789abcdef", "0123456789abcdef"));
    }

    #[test]
    fn different_strings_do_not_match() {
        assert!(!constant_time_eq_str("0123456789abcdef", "0123456789abcdeg"));
        assert!(!constant_time_eq_str("short", "shorter"));
        assert!(!constant_time_eq_str("", "x"));
    }
}
