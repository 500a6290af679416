//! HTTP server for the logs API.

mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
pub mod request;
pub mod response;

pub use config::{CliArgs, ServerConfig};
pub use error::ApiError;
pub use http::{ApiServer, router};
