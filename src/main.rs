//! Logs Dashboard API server binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logdash::server::{ApiServer, CliArgs, ServerConfig};
use logdash::store;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();
    let server_config = ServerConfig::from(&args);

    // Open the store
    let store = store::open(Default::default());

    // Create and run the server
    let server = ApiServer::new(store, server_config);
    server.run().await;
}
