use serde::{Deserialize, Serialize};

use super::instance::Instance;

/// Pagination and ordering for a search
///
/// `limit` of 0 means unbounded. `sort` names a single field, with a `-`
/// prefix for descending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Page {
    pub start: u64,
    pub limit: u64,
    pub sort: Option<String>,
}

impl Page {
    /// A page returning everything in store order
    pub fn all() -> Self {
        Self::default()
    }

    /// A page returning `limit` items from `start`
    pub fn new(start: u64, limit: u64) -> Self {
        Self {
            start,
            limit,
            sort: None,
        }
    }

    /// Sort by the given field (`-` prefix for descending)
    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// One page of instances plus the total match count
///
/// The count comes from a separate query over the same filter and is not
/// transactionally consistent with the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryResult {
    pub count: u64,
    pub items: Vec<Instance>,
}

/// Identity of a newly created instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedInstance {
    pub id: u64,
}

/// Per-item failure record from bulk create
///
/// Carries the original input index and payload so the caller can retry or
/// report the exact item that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    pub message: String,
    pub code: String,
    pub original_index: usize,
    pub data: Instance,
}

/// Result of bulk create: successes and per-item exceptions
///
/// Bulk create never aborts early and never rolls back earlier successes;
/// both lists can be non-empty at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CreateManyResult {
    pub created: Vec<CreatedInstance>,
    pub exceptions: Vec<ExceptionRecord>,
}

/// Number of instances matched by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdatedCount {
    pub count: u64,
}

/// Number of instances removed by a delete or cascade delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeletedCount {
    pub count: u64,
}
