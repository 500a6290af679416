//! HTTP route handlers for the logs API.
//!
//! Handlers are thin orchestration: parse parameters, run the validator on
//! write paths, delegate to the query engine or store, and shape the
//! response. Validation runs before any store call, so a rejected write
//! leaves the store unmodified.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;

use super::error::ApiError;
use super::metrics::Metrics;
use super::request::{
    CreateLogRequest, ExportParams, HistogramParams, ListParams, SearchParams, UpdateLogRequest,
};
use super::response::{
    AggregationResponse, DeleteResponse, HealthResponse, HistogramResponse, LogListResponse,
    ServiceInfo,
};
use crate::error::Error;
use crate::model::{LogId, LogPatch, NewLog};
use crate::query::{CSV_HEADER, QueryEngine, csv_row};
use crate::store::LogStore;
use crate::validate;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LogStore>,
    pub engine: QueryEngine,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>, metrics: Arc<Metrics>) -> Self {
        let engine = QueryEngine::new(store.clone());
        AppState {
            store,
            engine,
            metrics,
        }
    }
}

/// Handle GET /
pub async fn handle_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Logs Dashboard API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}

/// Handle POST /logs
pub async fn handle_create_log(
    State(state): State<AppState>,
    Json(body): Json<CreateLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(source = %body.source, severity = %body.severity, "creating log entry");

    if let Err(err) = validate::validate_create(&body.message, &body.source, body.timestamp, Utc::now())
    {
        tracing::warn!(error = %err, "log creation rejected");
        return Err(err.into());
    }

    let record = state
        .store
        .insert(NewLog {
            message: body.message,
            severity: body.severity,
            source: body.source,
            timestamp: body.timestamp,
        })
        .await?;

    state.metrics.logs_created_total.inc();
    tracing::info!(id = record.id, "log created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handle GET /logs
pub async fn handle_list_logs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<LogListResponse>, ApiError> {
    tracing::info!(page = params.page, page_size = params.page_size, "listing logs");

    let page = state.engine.list(&params.filter(), &params.options()).await?;
    state.metrics.list_queries_total.inc();

    tracing::info!(total = page.total, "list query complete");
    Ok(Json(LogListResponse::from(page)))
}

/// Handle GET /logs/search
pub async fn handle_search_logs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<AggregationResponse>, ApiError> {
    let group_by = params.group_by();
    tracing::info!(?group_by, "aggregating logs");

    let aggregation = state.engine.aggregate(&params.filter(), group_by).await?;
    state.metrics.aggregation_queries_total.inc();

    tracing::info!(
        buckets = aggregation.buckets.len(),
        total = aggregation.total_count,
        "aggregation complete"
    );
    Ok(Json(AggregationResponse::from(aggregation)))
}

/// Handle GET /logs/export/csv
///
/// The body is a chunked stream, one CSV row per chunk, so a large export
/// never holds the full serialized document in one allocation.
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("exporting logs to CSV");

    let records = state.engine.export(&params.filter()).await?;
    state.metrics.csv_exports_total.inc();
    tracing::info!(records = records.len(), "CSV export ready");

    let rows = std::iter::once(CSV_HEADER.to_string())
        .chain(records.into_iter().map(|record| csv_row(&record)))
        .map(Ok::<String, Infallible>);
    let body = Body::from_stream(futures::stream::iter(rows));

    let filename = format!("logs_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        ),
    ];
    Ok((headers, body))
}

/// Handle GET /logs/histogram
pub async fn handle_histogram(
    State(state): State<AppState>,
    Query(params): Query<HistogramParams>,
) -> Result<Json<HistogramResponse>, ApiError> {
    tracing::info!("generating severity histogram");

    let filter = params.filter();
    let histogram = state.engine.histogram(&filter).await?;
    Ok(Json(HistogramResponse::new(histogram, &filter)))
}

/// Handle GET /logs/{id}
pub async fn handle_get_log(
    State(state): State<AppState>,
    Path(id): Path<LogId>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.store.get(id).await?.ok_or_else(|| {
        tracing::warn!(id, "log not found");
        Error::NotFound
    })?;
    Ok(Json(record))
}

/// Handle PUT /logs/{id}
pub async fn handle_update_log(
    State(state): State<AppState>,
    Path(id): Path<LogId>,
    Json(body): Json<UpdateLogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(id, "updating log entry");

    // Existence first: an unknown id is 404 even when the payload is
    // also invalid.
    let Some(existing) = state.store.get(id).await? else {
        tracing::warn!(id, "log not found for update");
        return Err(Error::NotFound.into());
    };

    let patch = LogPatch {
        message: body.message,
        severity: body.severity,
        source: body.source,
        timestamp: body.timestamp,
    };
    if let Err(err) = validate::validate_patch(&patch, Utc::now()) {
        tracing::warn!(id, error = %err, "log update rejected");
        return Err(err.into());
    }

    // Nothing to merge; skip the store write.
    if patch.is_empty() {
        return Ok(Json(existing));
    }

    let record = state
        .store
        .update(id, patch)
        .await?
        .ok_or(Error::NotFound)?;

    state.metrics.logs_updated_total.inc();
    tracing::info!(id, "log updated");
    Ok(Json(record))
}

/// Handle DELETE /logs/{id}
pub async fn handle_delete_log(
    State(state): State<AppState>,
    Path(id): Path<LogId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    tracing::info!(id, "deleting log entry");

    if !state.store.delete(id).await? {
        tracing::warn!(id, "log not found for deletion");
        return Err(Error::NotFound.into());
    }

    state.metrics.logs_deleted_total.inc();
    tracing::info!(id, "log deleted");
    Ok(Json(DeleteResponse {
        message: format!("Log {id} deleted successfully"),
    }))
}
