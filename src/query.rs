//! Query engine: the filtered views over the log store.
//!
//! A single [`LogFilter`] predicate is composed from request parameters and
//! reused across every read view: paginated list, grouped aggregation,
//! severity histogram and CSV export. All views observe the same records for
//! the same filter, so a count on one view is consistent with the rows on
//! another.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{LogRecord, Severity};
use crate::store::LogStore;

/// Maximum accepted page size for the list view.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Combined filter condition over log records.
///
/// All present fields are ANDed; absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact severity match.
    pub severity: Option<Severity>,
    /// Exact source match.
    pub source: Option<String>,
    /// Inclusive lower bound on `timestamp`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `timestamp`.
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive substring match on `message`.
    pub search: Option<String>,
}

impl LogFilter {
    /// Evaluates the predicate against a single record.
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(severity) = self.severity {
            if record.severity != severity {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &record.source != source {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.timestamp > end {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !record
                .message
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    /// A copy of this filter without the search term, as used by the
    /// histogram view.
    pub fn without_search(&self) -> LogFilter {
        LogFilter {
            search: None,
            ..self.clone()
        }
    }
}

/// Sort key for the paginated list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Timestamp,
    Severity,
    Source,
}

impl SortField {
    /// Resolves a client-supplied field name.
    ///
    /// Unrecognized names fall back to `Timestamp` rather than raising, so
    /// a typo in `sort_by` degrades to the default ordering.
    pub fn from_name(name: &str) -> SortField {
        match name {
            "timestamp" => SortField::Timestamp,
            "severity" => SortField::Severity,
            "source" => SortField::Source,
            _ => SortField::Timestamp,
        }
    }
}

/// Sort direction for the paginated list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Resolves a client-supplied order name. Only a case-insensitive
    /// `asc` selects ascending; everything else is descending.
    pub fn from_name(name: &str) -> SortOrder {
        if name.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Grouping dimension for the aggregation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    Severity,
    Source,
    /// UTC calendar day of `timestamp`, keyed `YYYY-MM-DD`.
    Date,
    /// Hour-truncated UTC timestamp, keyed `YYYY-MM-DD HH:00:00`.
    Hour,
}

impl GroupBy {
    /// Resolves a client-supplied dimension name, falling back to
    /// `Severity` for unrecognized input.
    pub fn from_name(name: &str) -> GroupBy {
        match name {
            "severity" => GroupBy::Severity,
            "source" => GroupBy::Source,
            "date" => GroupBy::Date,
            "hour" => GroupBy::Hour,
            _ => GroupBy::Severity,
        }
    }

    /// The grouping key for a record under this dimension.
    pub fn key_of(&self, record: &LogRecord) -> String {
        match self {
            GroupBy::Severity => record.severity.as_str().to_string(),
            GroupBy::Source => record.source.clone(),
            GroupBy::Date => record.timestamp.format("%Y-%m-%d").to_string(),
            GroupBy::Hour => record.timestamp.format("%Y-%m-%d %H:00:00").to_string(),
        }
    }
}

/// Pagination and sorting parameters for the list view.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: u64,
    /// Records per page, 1..=[`MAX_PAGE_SIZE`].
    pub page_size: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            page: 1,
            page_size: 50,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ListOptions {
    fn check(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::validation("Page must be at least 1"));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::validation("Page size must be between 1 and 1000"));
        }
        Ok(())
    }
}

/// One page of the list view.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<LogRecord>,
    /// Count over the full filtered set, independent of pagination.
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    /// `ceil(total / page_size)`; zero when nothing matches.
    pub total_pages: u64,
}

/// A (group key, count) pair from the aggregation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationBucket {
    pub key: String,
    pub count: u64,
}

/// Result of the grouped-aggregation view.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub group_by: GroupBy,
    pub buckets: Vec<AggregationBucket>,
    /// Count of all records matching the filter, independent of the
    /// grouping dimension.
    pub total_count: u64,
}

/// The query engine: evaluates the four read views against a store.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn LogStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Paginated list view.
    ///
    /// The total is computed over the full filtered set; the item slice
    /// covers `(page - 1) * page_size .. page * page_size` of it. For a
    /// static dataset the same filter and page always yield the same
    /// slice: sort-key ties are broken by id ascending.
    pub async fn list(&self, filter: &LogFilter, options: &ListOptions) -> Result<Page> {
        options.check()?;
        // Saturating: a page number past the end of u64 space must yield an
        // empty page, not wrap the offset back into the result set.
        let offset = options
            .page
            .saturating_sub(1)
            .saturating_mul(options.page_size);
        let (items, total) = self
            .store
            .query(
                filter,
                options.sort_by,
                options.sort_order,
                offset,
                Some(options.page_size),
            )
            .await?;
        Ok(Page {
            items,
            total,
            page: options.page,
            page_size: options.page_size,
            total_pages: total_pages(total, options.page_size),
        })
    }

    /// Grouped-aggregation view.
    ///
    /// `total_count` counts every record matching the filter, not the sum
    /// over buckets of the grouped dimension (the two coincide unless a
    /// backend drops records with absent dimension values).
    pub async fn aggregate(&self, filter: &LogFilter, group_by: GroupBy) -> Result<Aggregation> {
        let buckets = self.store.aggregate(filter, group_by).await?;
        let (_, total_count) = self
            .store
            .query(filter, SortField::Timestamp, SortOrder::Desc, 0, Some(0))
            .await?;
        Ok(Aggregation {
            group_by,
            buckets,
            total_count,
        })
    }

    /// Severity histogram view.
    ///
    /// Ignores any search term in the filter and always yields exactly five
    /// buckets in [`Severity::ALL`] order, zero-filled for levels absent
    /// from the filtered set.
    pub async fn histogram(&self, filter: &LogFilter) -> Result<Vec<(Severity, u64)>> {
        let filter = filter.without_search();
        let buckets = self.store.aggregate(&filter, GroupBy::Severity).await?;
        let histogram = Severity::ALL
            .iter()
            .map(|severity| {
                let count = buckets
                    .iter()
                    .find(|b| b.key == severity.as_str())
                    .map(|b| b.count)
                    .unwrap_or(0);
                (*severity, count)
            })
            .collect();
        Ok(histogram)
    }

    /// CSV export view: every matching record, timestamp descending.
    pub async fn export(&self, filter: &LogFilter) -> Result<Vec<LogRecord>> {
        let (records, _) = self
            .store
            .query(filter, SortField::Timestamp, SortOrder::Desc, 0, None)
            .await?;
        Ok(records)
    }
}

/// `ceil(total / page_size)` without floating point.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}

/// The CSV export header row.
pub const CSV_HEADER: &str = "ID,Timestamp,Severity,Source,Message\r\n";

/// Renders one record as a CSV row, trailing CRLF included.
///
/// Timestamps are ISO-8601; severity is its enum string. Fields containing
/// a comma, quote or newline are quoted with doubled inner quotes.
pub fn csv_row(record: &LogRecord) -> String {
    format!(
        "{},{},{},{},{}\r\n",
        record.id,
        csv_field(&record.timestamp.to_rfc3339()),
        record.severity.as_str(),
        csv_field(&record.source),
        csv_field(&record.message),
    )
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
