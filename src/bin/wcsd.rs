//! WCS Daemon - live widget configuration server
//!
//! Runs the WebSocket endpoint that apps and editor UIs connect to, plus a
//! small HTTP server for the dashboard page.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (dashboard on :8080, WebSocket on :8081)
//! wcsd
//!
//! # Load settings from a file, then override one of them
//! wcsd --config wcs.toml --ws-addr 0.0.0.0:9001
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wcsd::config::{ConfigOverrides, ServerConfig};
use wcsd::registry::spawn_registry;
use wcsd::server::ConfigServer;

/// WCS daemon - live widget configuration server
#[derive(Parser, Debug)]
#[command(name = "wcsd", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Dashboard HTTP address (overrides WCS_HTTP_ADDR)
    #[arg(long, value_name = "ADDR")]
    http_addr: Option<String>,

    /// WebSocket address (overrides WCS_WS_ADDR)
    #[arg(long, value_name = "ADDR")]
    ws_addr: Option<String>,

    /// Dashboard HTML file (overrides WCS_DASHBOARD)
    #[arg(long, value_name = "PATH")]
    dashboard: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            http_addr: self.http_addr.clone(),
            ws_addr: self.ws_addr.clone(),
            dashboard_path: self.dashboard.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServerConfig::load(args.config.as_deref())
        .and_then(|config| config.with_overrides(args.overrides()))
        .context("Failed to load configuration")?;

    run_server(config)
}

#[tokio::main]
async fn run_server(config: ServerConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("wcsd=info".parse()?)
                .add_directive("wcs_core=info".parse()?)
                .add_directive("wcs_protocol=info".parse()?),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        "WCS daemon starting"
    );

    let cancel_token = CancellationToken::new();

    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        info!("Shutdown signal received");
        shutdown_token.cancel();
    });

    let registry = spawn_registry();
    info!("Widget registry started");

    let server = ConfigServer::new(config, registry, cancel_token);

    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e).context("Server failed");
    }

    info!("WCS daemon stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
