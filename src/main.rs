//! Webhook inspector
//!
//! A small HTTP service for manual webhook testing: every request to
//! `/webhook` is recorded into a bounded in-memory log, and `/` renders
//! that log as an HTML page.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │               WEBHOOK INSPECTOR               │
//!                    │                                               │
//!   ALL /webhook     │  ┌─────────┐   ┌──────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ capture  │──▶│  capture   │  │
//!                    │  │ server  │   │ snapshot │   │  store     │  │
//!                    │  └─────────┘   └──────────┘   └─────┬──────┘  │
//!                    │                                     │         │
//!   GET /            │  ┌─────────┐   ┌──────────┐         │         │
//!   ◀────────────────┼──│  html   │◀──│  render  │◀────────┘         │
//!                    │  │ page    │   │  page    │  (read-only view) │
//!                    │  └─────────┘   └──────────┘                   │
//!                    │                                               │
//!                    │  cross-cutting: config, tracing, shutdown     │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hookbin::config::{load_config, resolve_port, AppConfig};
use hookbin::http::HttpServer;
use hookbin::RequestLog;

/// Records incoming webhooks and serves them back as an HTML page.
#[derive(Parser, Debug)]
#[command(name = "hookbin", version, about)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listening port; overrides the config file and the PORT variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let env_port = std::env::var("PORT").ok();
    let port = resolve_port(&config, cli.port, env_port.as_deref())?;
    config.listener.port = port;

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "hookbin={},tower_http=warn",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let log = Arc::new(RequestLog::new(config.capture.capacity));

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Webhook inspector running on http://{local_addr}");
    tracing::info!("Send requests to /webhook and open / in a browser to inspect them");

    let server = HttpServer::new(&config, log);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
