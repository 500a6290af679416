//! HTTP response types for the logs API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{LogRecord, Severity};
use crate::query::{Aggregation, GroupBy, LogFilter, Page};

/// Body for `GET /logs`.
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub items: Vec<LogRecord>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl From<Page> for LogListResponse {
    fn from(page: Page) -> Self {
        LogListResponse {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

/// One aggregation bucket on the wire. Exactly one of the dimension fields
/// is set, matching the active `group_by`; date and hour groups both use
/// the `date` field.
#[derive(Debug, Serialize)]
pub struct AggregationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub count: u64,
}

/// Body for `GET /logs/search`.
#[derive(Debug, Serialize)]
pub struct AggregationResponse {
    pub aggregations: Vec<AggregationEntry>,
    pub total_count: u64,
}

impl From<Aggregation> for AggregationResponse {
    fn from(aggregation: Aggregation) -> Self {
        let group_by = aggregation.group_by;
        let aggregations = aggregation
            .buckets
            .into_iter()
            .map(|bucket| {
                let mut entry = AggregationEntry {
                    severity: None,
                    source: None,
                    date: None,
                    count: bucket.count,
                };
                match group_by {
                    GroupBy::Severity => entry.severity = Some(bucket.key),
                    GroupBy::Source => entry.source = Some(bucket.key),
                    GroupBy::Date | GroupBy::Hour => entry.date = Some(bucket.key),
                }
                entry
            })
            .collect();
        AggregationResponse {
            aggregations,
            total_count: aggregation.total_count,
        }
    }
}

/// One severity bucket of the histogram.
#[derive(Debug, Serialize)]
pub struct HistogramEntry {
    pub severity: Severity,
    pub count: u64,
}

/// Echo of the filter values the histogram was computed over.
#[derive(Debug, Serialize)]
pub struct HistogramFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

/// Body for `GET /logs/histogram`: always exactly five entries, one per
/// severity level in declared order.
#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    pub histogram: Vec<HistogramEntry>,
    pub filters: HistogramFilters,
}

impl HistogramResponse {
    pub fn new(histogram: Vec<(Severity, u64)>, filter: &LogFilter) -> Self {
        HistogramResponse {
            histogram: histogram
                .into_iter()
                .map(|(severity, count)| HistogramEntry { severity, count })
                .collect(),
            filters: HistogramFilters {
                start_date: filter.start_date,
                end_date: filter.end_date,
                source: filter.source.clone(),
            },
        }
    }
}

/// Body for `DELETE /logs/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Body for `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
}

/// Body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AggregationBucket;

    #[test]
    fn should_serialize_severity_buckets_under_severity_field() {
        // given
        let aggregation = Aggregation {
            group_by: GroupBy::Severity,
            buckets: vec![AggregationBucket {
                key: "ERROR".to_string(),
                count: 7,
            }],
            total_count: 7,
        };

        // when
        let json = serde_json::to_string(&AggregationResponse::from(aggregation)).unwrap();

        // then
        assert!(json.contains(r#""severity":"ERROR""#));
        assert!(json.contains(r#""count":7"#));
        assert!(json.contains(r#""total_count":7"#));
        assert!(!json.contains(r#""date""#));
    }

    #[test]
    fn should_serialize_hour_buckets_under_date_field() {
        // given
        let aggregation = Aggregation {
            group_by: GroupBy::Hour,
            buckets: vec![AggregationBucket {
                key: "2024-03-15 10:00:00".to_string(),
                count: 2,
            }],
            total_count: 2,
        };

        // when
        let json = serde_json::to_string(&AggregationResponse::from(aggregation)).unwrap();

        // then
        assert!(json.contains(r#""date":"2024-03-15 10:00:00""#));
    }

    #[test]
    fn should_echo_null_filters_in_histogram_response() {
        // given
        let histogram: Vec<(Severity, u64)> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();

        // when
        let response = HistogramResponse::new(histogram, &LogFilter::default());
        let json = serde_json::to_value(&response).unwrap();

        // then
        assert_eq!(json["histogram"].as_array().unwrap().len(), 5);
        assert!(json["filters"]["start_date"].is_null());
        assert!(json["filters"]["source"].is_null());
    }
}
