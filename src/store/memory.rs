//! In-memory log store.
//!
//! Records live in a `BTreeMap` keyed by id behind a single `RwLock`; the
//! lock is the consistency point required of the store (a read after a
//! committed write on the same record observes the write). Each mutation
//! takes the write lock once, so a failed operation cannot leave a partial
//! write behind.

use std::collections::BTreeMap;
use std::cmp::Ordering;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::model::{LogId, LogPatch, LogRecord, NewLog};
use crate::query::{AggregationBucket, GroupBy, LogFilter, SortField, SortOrder};
use crate::store::LogStore;

/// In-process [`LogStore`] implementation.
pub struct MemoryStore {
    next_id: AtomicI64,
    records: RwLock<BTreeMap<LogId, LogRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparator for the requested sort, with id ascending as the tiebreak so
/// pagination over equal sort keys stays deterministic.
fn compare(a: &LogRecord, b: &LogRecord, sort_by: SortField, sort_order: SortOrder) -> Ordering {
    let primary = match sort_by {
        SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortField::Severity => a.severity.cmp(&b.severity),
        SortField::Source => a.source.cmp(&b.source),
    };
    let primary = match sort_order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn insert(&self, new: NewLog) -> Result<LogRecord> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let record = LogRecord {
            id,
            timestamp: new.timestamp.unwrap_or_else(Utc::now),
            message: new.message,
            severity: new.severity,
            source: new.source,
        };
        let mut records = self.records.write().expect("log map lock poisoned");
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: LogId) -> Result<Option<LogRecord>> {
        let records = self.records.read().expect("log map lock poisoned");
        Ok(records.get(&id).cloned())
    }

    async fn update(&self, id: LogId, patch: LogPatch) -> Result<Option<LogRecord>> {
        let mut records = self.records.write().expect("log map lock poisoned");
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(message) = patch.message {
            record.message = message;
        }
        if let Some(severity) = patch.severity {
            record.severity = severity;
        }
        if let Some(source) = patch.source {
            record.source = source;
        }
        if let Some(timestamp) = patch.timestamp {
            record.timestamp = timestamp;
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: LogId) -> Result<bool> {
        let mut records = self.records.write().expect("log map lock poisoned");
        Ok(records.remove(&id).is_some())
    }

    async fn query(
        &self,
        filter: &LogFilter,
        sort_by: SortField,
        sort_order: SortOrder,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<LogRecord>, u64)> {
        let records = self.records.read().expect("log map lock poisoned");
        let mut matching: Vec<LogRecord> = records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        drop(records);

        let total = matching.len() as u64;
        matching.sort_by(|a, b| compare(a, b, sort_by, sort_order));

        let slice: Vec<LogRecord> = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .collect();
        Ok((slice, total))
    }

    async fn aggregate(
        &self,
        filter: &LogFilter,
        group_by: GroupBy,
    ) -> Result<Vec<AggregationBucket>> {
        let records = self.records.read().expect("log map lock poisoned");
        // BTreeMap keeps every dimension ordered by key; date and hour
        // require it, severity and source merely get a stable order.
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for record in records.values().filter(|r| filter.matches(r)) {
            *counts.entry(group_by.key_of(record)).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(key, count)| AggregationBucket { key, count })
            .collect())
    }
}
