//! Record store access.
//!
//! The search pipeline only sees the [`RecordStore`] trait. Implementations are
//! injected into [`SearchEngine`](crate::search::SearchEngine), so ranking and
//! response shaping can run against [`MemoryStore`] without a live table.

mod memory;

pub use memory::MemoryStore;

use crate::search::predicate::Filter;
use crate::types::CourseRecord;
use futures::future::BoxFuture;

/// A failed scan: connectivity, a malformed table, throttling and the like.
///
/// Scans are never retried by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record store scan failed: {cause}")]
pub struct StoreError {
    pub cause: String,
}

impl StoreError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// A scan-and-filter source of course records.
pub trait RecordStore: Send + Sync {
    /// Examine at most `limit` stored items and return those matching `filter`.
    ///
    /// `limit` bounds the raw items examined, not the number returned.
    /// No ordering is guaranteed.
    fn scan<'a>(
        &'a self,
        filter: &'a Filter,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CourseRecord>, StoreError>>;
}
