use thiserror::Error;

/// Result type alias using CmdbError
pub type Result<T> = std::result::Result<T, CmdbError>;

/// Canonical error kind taxonomy
///
/// Stable classification of all errors raised by the instance core. Each
/// kind maps to a stable error code used for programmatic handling and for
/// the per-item exception records produced by bulk create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdbErrorKind {
    Validation,
    NotFound,
    AssociationConflict,
    Storage,
    BindIpPropagation,
    InvalidIdentity,
    Serialization,
}

impl CmdbErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            CmdbErrorKind::Validation => "ERR_VALIDATION",
            CmdbErrorKind::NotFound => "ERR_NOT_FOUND",
            CmdbErrorKind::AssociationConflict => "ERR_ASSOCIATION_CONFLICT",
            CmdbErrorKind::Storage => "ERR_STORAGE",
            CmdbErrorKind::BindIpPropagation => "ERR_BIND_IP_PROPAGATION",
            CmdbErrorKind::InvalidIdentity => "ERR_INVALID_IDENTITY",
            CmdbErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Errors raised by the instance core
///
/// Variants carry enough context (object type, rendered condition, instance
/// id) for a caller to retry or report precisely.
#[derive(Debug, Error)]
pub enum CmdbError {
    /// Field values rejected by the validation gateway
    #[error("validation rejected for object type {object_type}: {reason}")]
    Validation { object_type: String, reason: String },

    /// Update or delete matched zero instances
    #[error("no instance of object type {object_type} matched condition {condition}")]
    NotFound {
        object_type: String,
        condition: String,
    },

    /// Delete blocked because another instance still references the target
    #[error("instance {instance_id} of object type {object_type} still has associations")]
    AssociationConflict {
        object_type: String,
        instance_id: u64,
    },

    /// Underlying store operation failed; never retried internally
    #[error("storage operation {op} failed: {reason}")]
    Storage { op: String, reason: String },

    /// Bind-ip propagation failed after the host write was already applied
    ///
    /// The host instances remain updated; dependent process bind addresses
    /// may be stale. Callers decide on compensating action.
    #[error("bind ip propagation failed: {reason}")]
    BindIpPropagation { reason: String },

    /// An instance's identity field is missing or not coercible to an id
    #[error("invalid identity for object type {object_type}: {reason}")]
    InvalidIdentity {
        object_type: String,
        reason: String,
    },

    /// A document could not be decoded into its typed representation
    #[error("serialization failed: {reason}")]
    Serialization { reason: String },
}

impl CmdbError {
    /// Get the error kind classification
    pub fn kind(&self) -> CmdbErrorKind {
        match self {
            CmdbError::Validation { .. } => CmdbErrorKind::Validation,
            CmdbError::NotFound { .. } => CmdbErrorKind::NotFound,
            CmdbError::AssociationConflict { .. } => CmdbErrorKind::AssociationConflict,
            CmdbError::Storage { .. } => CmdbErrorKind::Storage,
            CmdbError::BindIpPropagation { .. } => CmdbErrorKind::BindIpPropagation,
            CmdbError::InvalidIdentity { .. } => CmdbErrorKind::InvalidIdentity,
            CmdbError::Serialization { .. } => CmdbErrorKind::Serialization,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Construct a storage error for the given operation
    pub fn storage(op: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        CmdbError::Storage {
            op: op.into(),
            reason: reason.to_string(),
        }
    }
}
