//! Server configuration and CLI arguments.

use clap::Parser;

/// Command-line arguments for the logdash server binary.
#[derive(Debug, Parser)]
#[command(name = "logdash", about = "Logs Dashboard API server")]
pub struct CliArgs {
    /// Port for the HTTP server.
    #[arg(long, default_value_t = 8000, env = "LOGDASH_PORT")]
    pub port: u16,
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl From<&CliArgs> for ServerConfig {
    fn from(args: &CliArgs) -> Self {
        ServerConfig { port: args.port }
    }
}
