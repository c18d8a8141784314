//! Correlation types for request tracking and tenant scoping
//!
//! Every operation in the instance core receives an explicit
//! [`RequestContext`] rather than relying on ambient/global state. The
//! context carries the owner (tenant) the request acts on behalf of, a
//! request id for log correlation, and an optional locale for error
//! rendering at the transport layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the owner (tenant) an instance belongs to
///
/// Every instance carries exactly one owner, and every read and write is
/// scoped to the owner in the request context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an OwnerId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Context carried through operation boundaries
///
/// Owns the tenant identity for scoping plus correlation data for logs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub owner: OwnerId,
    pub request_id: RequestId,
    pub locale: Option<String>,
}

impl RequestContext {
    /// Create a new context for the given owner with a fresh RequestId
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            request_id: RequestId::new(),
            locale: None,
        }
    }

    /// Create a context with an existing RequestId (propagated from a caller)
    pub fn with_request_id(owner: OwnerId, request_id: RequestId) -> Self {
        Self {
            owner,
            request_id,
            locale: None,
        }
    }

    /// Add a locale to the context
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}
