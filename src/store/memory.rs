//! In-process record store.

use super::{RecordStore, StoreError};
use crate::search::predicate::Filter;
use crate::types::CourseRecord;
use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::Path;

/// Record store backed by a vector, evaluating filters with [`Filter::matches`].
///
/// Items are examined in insertion order, which is also the return order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<CourseRecord>,
}

impl MemoryStore {
    pub const fn new(records: Vec<CourseRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSON file holding an array of items.
    pub async fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read records from {}", path.display()))?;
        let records: Vec<CourseRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records in {}", path.display()))?;

        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn scan<'a>(
        &'a self,
        filter: &'a Filter,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CourseRecord>, StoreError>> {
        async move {
            let matched: Vec<CourseRecord> = self
                .records
                .iter()
                .take(limit)
                .filter(|record| filter.matches(record))
                .cloned()
                .collect();
            Ok::<_, StoreError>(matched)
        }
        .boxed()
    }
}
