//! Logs Dashboard API - CRUD and analytics over log records.
//!
//! A small HTTP service around a single append-mostly entity: the log
//! record. Clients create, read, update and delete entries; query them with
//! filters, free-text search, sorting and pagination; fetch grouped
//! aggregations and a fixed-bucket severity histogram; and export filtered
//! results as CSV.
//!
//! # Architecture
//!
//! The interesting part is the query engine: one [`LogFilter`] predicate is
//! composed from request parameters and reused across every read view, so
//! list counts, aggregation totals, histogram buckets and CSV rows all
//! agree for the same filter. Everything else is thin plumbing around it:
//!
//! - [`store::LogStore`]: the storage collaborator, a capability trait with
//!   an in-memory implementation.
//! - [`validate`]: pure field checks on create/update input.
//! - [`query::QueryEngine`]: the four read views (paginated list, grouped
//!   aggregation, histogram, CSV export).
//! - [`server`]: axum routing, request parsing and response shaping.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use logdash::{MemoryStore, NewLog, QueryEngine, Severity};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert(NewLog {
//!     message: "service started".into(),
//!     severity: Severity::Info,
//!     source: "api".into(),
//!     timestamp: None,
//! }).await?;
//!
//! let engine = QueryEngine::new(store);
//! let histogram = engine.histogram(&Default::default()).await?;
//! assert_eq!(histogram.len(), 5);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod server;
pub mod store;
pub mod validate;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use model::{LogId, LogPatch, LogRecord, NewLog, Severity};
pub use query::{GroupBy, ListOptions, LogFilter, Page, QueryEngine, SortField, SortOrder};
pub use store::{LogStore, MemoryStore};
