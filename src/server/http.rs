//! HTTP server implementation for the logs API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::signal;

use super::config::ServerConfig;
use super::handlers::{
    AppState, handle_create_log, handle_delete_log, handle_export_csv, handle_get_log,
    handle_health, handle_histogram, handle_list_logs, handle_metrics, handle_root,
    handle_search_logs, handle_update_log,
};
use super::metrics::Metrics;
use crate::store::LogStore;

/// Builds the API router over the given state.
///
/// Literal routes (`/logs/search`, `/logs/export/csv`, `/logs/histogram`)
/// take precedence over the `/logs/{id}` capture.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .route("/logs", get(handle_list_logs).post(handle_create_log))
        .route("/logs/search", get(handle_search_logs))
        .route("/logs/export/csv", get(handle_export_csv))
        .route("/logs/histogram", get(handle_histogram))
        .route(
            "/logs/{id}",
            get(handle_get_log)
                .put(handle_update_log)
                .delete(handle_delete_log),
        )
        .with_state(state)
}

/// HTTP server for the logs API.
pub struct ApiServer {
    store: Arc<dyn LogStore>,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(store: Arc<dyn LogStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    /// Run the HTTP server until shutdown is signalled.
    pub async fn run(self) {
        let metrics = Arc::new(Metrics::new());
        let state = AppState::new(self.store, metrics);
        let app = router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("Starting logs API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listener");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .expect("server error");

        tracing::info!("Server shut down gracefully");
    }
}

/// Listen for SIGTERM (pod termination) and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
