//! Hook Router server.
//!
//! Loads configuration, wires the built-in services and serves their
//! routes until SIGINT/SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use hook_router::config::{load_config, AppConfig};
use hook_router::lifecycle::{build_application, signals, Shutdown};
use hook_router::observability::{logging, metrics};
use hook_router::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "hook-router", version, about = "Serve hook-composed routes")]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("hook-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let app = build_application(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, app.routes, app.services);
    let serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::forward_signals(&shutdown).await;
    serving.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
