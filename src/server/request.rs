//! HTTP request types for the logs API.
//!
//! Query parameter and body structs, plus conversion into the query
//! engine's filter and option types. Timestamps are accepted as RFC 3339
//! or as naive ISO-8601 (assumed UTC), matching what dashboard clients
//! actually send.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::model::Severity;
use crate::query::{GroupBy, ListOptions, LogFilter, SortField, SortOrder};

/// Parses an RFC 3339 or naive ISO-8601 datetime string. Naive values are
/// interpreted as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Deserializes an optional datetime with [`parse_datetime`] semantics.
/// Empty strings count as absent.
fn de_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse_datetime(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {s}"))),
    }
}

/// Body for `POST /logs`.
#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub message: String,
    pub severity: Severity,
    pub source: String,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body for `PUT /logs/{id}`. Any subset of fields may be present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLogRequest {
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    50
}

/// Query parameters for `GET /logs`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub severity: Option<Severity>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            severity: self.severity,
            source: self.source.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            search: self.search.clone(),
        }
    }

    pub fn options(&self) -> ListOptions {
        ListOptions {
            page: self.page,
            page_size: self.page_size,
            sort_by: SortField::from_name(self.sort_by.as_deref().unwrap_or("timestamp")),
            sort_order: SortOrder::from_name(self.sort_order.as_deref().unwrap_or("desc")),
        }
    }
}

/// Query parameters for `GET /logs/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub severity: Option<Severity>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub group_by: Option<String>,
}

impl SearchParams {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            severity: self.severity,
            source: self.source.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            search: None,
        }
    }

    pub fn group_by(&self) -> GroupBy {
        GroupBy::from_name(self.group_by.as_deref().unwrap_or("severity"))
    }
}

/// Query parameters for `GET /logs/export/csv`.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub severity: Option<Severity>,
    pub source: Option<String>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl ExportParams {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            severity: self.severity,
            source: self.source.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            search: self.search.clone(),
        }
    }
}

/// Query parameters for `GET /logs/histogram`.
#[derive(Debug, Deserialize)]
pub struct HistogramParams {
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

impl HistogramParams {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            source: self.source.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            ..Default::default()
        }
    }
}
