//! Integration tests for the store and query engine, below the HTTP layer.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use logdash::query::ListOptions;
use logdash::{
    GroupBy, LogFilter, LogStore, MemoryStore, NewLog, QueryEngine, Severity, SortField, SortOrder,
};

fn setup_engine() -> (Arc<MemoryStore>, QueryEngine) {
    let store = Arc::new(MemoryStore::new());
    let engine = QueryEngine::new(store.clone());
    (store, engine)
}

fn new_log(message: &str, severity: Severity, source: &str, hour: u32, minute: u32) -> NewLog {
    NewLog {
        message: message.to_string(),
        severity,
        source: source.to_string(),
        timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 15, hour, minute, 0).unwrap()),
    }
}

#[tokio::test]
async fn test_list_view_pagination_arithmetic() {
    let (store, engine) = setup_engine();
    for i in 0..25 {
        store
            .insert(new_log(
                &format!("entry {i}"),
                Severity::Info,
                "api",
                10,
                i,
            ))
            .await
            .unwrap();
    }

    let filter = LogFilter::default();
    let mut seen = std::collections::HashSet::new();
    for (page, expected_len) in [(1u64, 10usize), (2, 10), (3, 5)] {
        let result = engine
            .list(
                &filter,
                &ListOptions {
                    page,
                    page_size: 10,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.items.len(), expected_len);
        for item in &result.items {
            assert!(seen.insert(item.id), "id {} appeared on two pages", item.id);
        }
    }
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn test_list_view_handles_page_number_at_u64_max() {
    let (store, engine) = setup_engine();
    for i in 0..5 {
        store
            .insert(new_log(
                &format!("entry {i}"),
                Severity::Info,
                "api",
                10,
                i,
            ))
            .await
            .unwrap();
    }

    // A page far past the end of the data is valid input; the offset must
    // saturate rather than wrap, yielding an empty page with the totals
    // still intact.
    let result = engine
        .list(
            &LogFilter::default(),
            &ListOptions {
                page: u64::MAX,
                page_size: 1000,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.items.is_empty());
    assert_eq!(result.total, 5);
    assert_eq!(result.total_pages, 1);
}

#[tokio::test]
async fn test_list_view_rejects_bad_pagination() {
    let (_, engine) = setup_engine();
    let filter = LogFilter::default();

    let err = engine
        .list(
            &filter,
            &ListOptions {
                page: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Page must be at least 1");

    let err = engine
        .list(
            &filter,
            &ListOptions {
                page_size: 1001,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Page size must be between 1 and 1000");
}

#[tokio::test]
async fn test_list_view_default_order_is_timestamp_descending() {
    let (store, engine) = setup_engine();
    store
        .insert(new_log("oldest", Severity::Info, "api", 8, 0))
        .await
        .unwrap();
    store
        .insert(new_log("newest", Severity::Info, "api", 12, 0))
        .await
        .unwrap();
    store
        .insert(new_log("middle", Severity::Info, "api", 10, 0))
        .await
        .unwrap();

    let page = engine
        .list(&LogFilter::default(), &ListOptions::default())
        .await
        .unwrap();

    let messages: Vec<&str> = page.items.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_views_share_one_filtered_set() {
    let (store, engine) = setup_engine();
    store
        .insert(new_log("api error one", Severity::Error, "api", 9, 0))
        .await
        .unwrap();
    store
        .insert(new_log("api error two", Severity::Error, "api", 10, 0))
        .await
        .unwrap();
    store
        .insert(new_log("worker error", Severity::Error, "worker", 11, 0))
        .await
        .unwrap();

    let filter = LogFilter {
        source: Some("api".to_string()),
        ..Default::default()
    };

    // List, aggregation total and export all agree on the same 2 records.
    let page = engine.list(&filter, &ListOptions::default()).await.unwrap();
    let aggregation = engine.aggregate(&filter, GroupBy::Severity).await.unwrap();
    let exported = engine.export(&filter).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(aggregation.total_count, 2);
    assert_eq!(exported.len(), 2);
}

#[tokio::test]
async fn test_histogram_ignores_search_term() {
    let (store, engine) = setup_engine();
    store
        .insert(new_log("alpha event", Severity::Info, "api", 9, 0))
        .await
        .unwrap();
    store
        .insert(new_log("beta event", Severity::Warning, "api", 10, 0))
        .await
        .unwrap();

    let filter = LogFilter {
        search: Some("alpha".to_string()),
        ..Default::default()
    };
    let histogram = engine.histogram(&filter).await.unwrap();

    // Both records counted: the histogram view drops the search term.
    let total: u64 = histogram.iter().map(|(_, count)| count).sum();
    assert_eq!(total, 2);
    assert_eq!(histogram.len(), 5);
    assert_eq!(histogram[0].0, Severity::Debug);
    assert_eq!(histogram[4].0, Severity::Critical);
}

#[tokio::test]
async fn test_export_returns_all_matches_unpaginated() {
    let (store, engine) = setup_engine();
    for i in 0..120 {
        store
            .insert(new_log(
                &format!("bulk entry {i}"),
                Severity::Debug,
                "api",
                10,
                i % 60,
            ))
            .await
            .unwrap();
    }

    let exported = engine.export(&LogFilter::default()).await.unwrap();

    assert_eq!(exported.len(), 120);
    // Timestamp descending with id tiebreak: never out of order.
    for pair in exported.windows(2) {
        assert!(
            pair[0].timestamp > pair[1].timestamp
                || (pair[0].timestamp == pair[1].timestamp && pair[0].id < pair[1].id)
        );
    }
}

#[tokio::test]
async fn test_concurrent_inserts_get_distinct_ids() {
    let store = Arc::new(MemoryStore::new());
    let mut handles = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert(NewLog {
                    message: format!("concurrent entry {i}"),
                    severity: Severity::Info,
                    source: "api".to_string(),
                    timestamp: None,
                })
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn test_query_slice_consistent_with_sort_by_severity() {
    let (store, _) = setup_engine();
    for (severity, minute) in [
        (Severity::Critical, 0),
        (Severity::Debug, 1),
        (Severity::Error, 2),
        (Severity::Info, 3),
        (Severity::Warning, 4),
    ] {
        store
            .insert(new_log("severity sorted", severity, "api", 10, minute))
            .await
            .unwrap();
    }

    let (records, total) = store
        .query(
            &LogFilter::default(),
            SortField::Severity,
            SortOrder::Desc,
            0,
            Some(2),
        )
        .await
        .unwrap();

    assert_eq!(total, 5);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].severity, Severity::Critical);
    assert_eq!(records[1].severity, Severity::Error);
}
