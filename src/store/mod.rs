//! Log store abstraction.
//!
//! The store is the single durable collaborator of the API: keyed storage
//! for log records with query, sort and aggregate capability. It is modeled
//! as a capability trait rather than a specific product; [`MemoryStore`] is
//! the in-process implementation used by default and in tests.

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::model::{LogId, LogPatch, LogRecord, NewLog};
use crate::query::{AggregationBucket, GroupBy, LogFilter, SortField, SortOrder};

mod memory;

pub use memory::MemoryStore;

/// Durable keyed storage for log records.
///
/// The store is the sole serialization point for concurrent requests and
/// provides per-record read-after-write consistency: a read immediately
/// following a committed write on the same record observes that write.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Inserts a record, assigning a fresh id and resolving a missing
    /// timestamp to the current time. Returns the stored record.
    async fn insert(&self, new: NewLog) -> Result<LogRecord>;

    /// Fetches a record by id.
    async fn get(&self, id: LogId) -> Result<Option<LogRecord>>;

    /// Merges the present fields of `patch` into the record and returns
    /// the updated record, or `None` if the id is unknown. An unknown id
    /// leaves the store unmodified.
    async fn update(&self, id: LogId, patch: LogPatch) -> Result<Option<LogRecord>>;

    /// Removes a record. Returns whether it existed.
    async fn delete(&self, id: LogId) -> Result<bool>;

    /// Evaluates the filter, sorts, and returns the `offset..offset+limit`
    /// slice together with the total matching count (computed before the
    /// slice is taken). `limit = None` returns all matches. Sort-key ties
    /// break by id ascending.
    async fn query(
        &self,
        filter: &LogFilter,
        sort_by: SortField,
        sort_order: SortOrder,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<LogRecord>, u64)>;

    /// Counts filtered records grouped by the given dimension. Date and
    /// hour buckets are ordered ascending by key.
    async fn aggregate(
        &self,
        filter: &LogFilter,
        group_by: GroupBy,
    ) -> Result<Vec<AggregationBucket>>;
}

/// Opens a store for the given backend configuration.
pub fn open(config: StoreConfig) -> std::sync::Arc<dyn LogStore> {
    match config {
        StoreConfig::InMemory => std::sync::Arc::new(MemoryStore::new()),
    }
}
