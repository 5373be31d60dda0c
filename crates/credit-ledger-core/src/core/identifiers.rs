// crates/credit-ledger-core/src/core/identifiers.rs
// ============================================================================
// Module: Credit Ledger Identifiers
// Description: Client, operation, tool, and tier identifiers.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Identifiers serialize as plain strings. [`ClientId`] and [`OperationId`]
//! validate at construction because they become storage key components;
//! [`ToolName`] stays opaque since unknown tools fall back to a default cost.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a client identifier in bytes.
pub const MAX_CLIENT_ID_LENGTH: usize = 256;
/// Maximum length of an operation identifier in characters.
pub const MAX_OPERATION_ID_LENGTH: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Client identifier is empty or too long.
    #[error("invalid client id: {0}")]
    InvalidClient(String),
    /// Operation identifier is empty, too long, or has disallowed characters.
    #[error("invalid operation id: {0}")]
    InvalidOperation(String),
}

// ============================================================================
// SECTION: Client Identifier
// ============================================================================

/// Resolved end-user identity that owns a quota ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Validates and wraps a client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidClient`] when the value is empty,
    /// longer than [`MAX_CLIENT_ID_LENGTH`], or contains control characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentifierError::InvalidClient("client id is empty".to_string()));
        }
        if value.len() > MAX_CLIENT_ID_LENGTH {
            return Err(IdentifierError::InvalidClient(format!(
                "client id exceeds {MAX_CLIENT_ID_LENGTH} bytes"
            )));
        }
        if value.chars().any(char::is_control) {
            return Err(IdentifierError::InvalidClient(
                "client id contains control characters".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for ClientId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Operation Identifier
// ============================================================================

/// Caller-chosen idempotency key for a single logical charge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationId(String);

impl OperationId {
    /// Trims, validates, and wraps an operation identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidOperation`] unless the trimmed value
    /// is 1 to [`MAX_OPERATION_ID_LENGTH`] characters of `[A-Za-z0-9_-]`.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::InvalidOperation("opId is required".to_string()));
        }
        if trimmed.len() > MAX_OPERATION_ID_LENGTH {
            return Err(IdentifierError::InvalidOperation(format!(
                "opId exceeds {MAX_OPERATION_ID_LENGTH} characters"
            )));
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-')
        {
            return Err(IdentifierError::InvalidOperation(
                "opId may only contain letters, digits, '_' and '-'".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for OperationId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OperationId> for String {
    fn from(value: OperationId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Tool Name
// ============================================================================

/// Name of a metered tool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ToolName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ToolName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Tier
// ============================================================================

/// Subscription tier selecting the daily credit cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free tier.
    #[default]
    Free,
    /// Paid tier.
    Pro,
}

impl Tier {
    /// Parses a recognized tier label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            _ => None,
        }
    }

    /// Parses a tier label, treating unknown labels as the free tier.
    #[must_use]
    pub fn from_label_or_free(label: &str) -> Self {
        Self::parse(label).unwrap_or(Self::Free)
    }

    /// Returns the stable tier label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
