//! Error handling for cmdbase-store
//!
//! Wraps backend failures into the core `CmdbError::Storage` variant so
//! callers see one error taxonomy regardless of store implementation.

use cmdbase_core::CmdbError;

/// Create a storage error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> CmdbError {
    CmdbError::storage(op, err)
}

/// Create a storage error from a document (de)serialization failure
pub fn from_serde(op: &str, err: serde_json::Error) -> CmdbError {
    CmdbError::storage(op, err)
}
