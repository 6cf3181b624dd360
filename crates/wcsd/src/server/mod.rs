//! Network endpoints for the config server.
//!
//! The server:
//! - Accepts WebSocket clients (editor UIs and running apps) on `ws_addr`
//! - Spawns a session per client that feeds the registry actor
//! - Serves the dashboard page over HTTP on `http_addr`
//! - Supports graceful shutdown via CancellationToken
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐          ┌─────────────────┐
//! │  ConfigServer   │          │  ConfigServer   │
//! │  (WebSocket)    │          │  (dashboard)    │
//! └───────┬─────────┘          └───────┬─────────┘
//!         │ upgrade                    │ GET /
//!         ▼                            ▼
//! ┌─────────────────┐          ┌─────────────────┐
//! │   run_session   │          │ dashboard.html  │
//! │  (per client)   │          │ (read per hit)  │
//! └───────┬─────────┘          └─────────────────┘
//!         │ submit
//!         ▼
//! ┌─────────────────┐
//! │ RegistryHandle  │
//! └─────────────────┘
//! ```
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations use `?`, pattern matching, or `unwrap_or`
//! - Bind and serve failures surface as `ServerError`

mod connection;
pub mod dashboard;

pub use connection::run_session;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::broadcast::ConnectionId;
use crate::config::ServerConfig;
use crate::registry::RegistryHandle;

/// WebSocket and dashboard server.
pub struct ConfigServer {
    /// Addresses, dashboard file and limits
    config: ServerConfig,

    /// Handle to the registry actor
    registry: RegistryHandle,

    /// Cancellation token for graceful shutdown
    cancel_token: CancellationToken,

    /// Connection counter for generating connection IDs
    connection_counter: Arc<AtomicU64>,
}

/// State shared by WebSocket upgrade handlers.
#[derive(Clone)]
struct SessionContext {
    registry: RegistryHandle,
    cancel_token: CancellationToken,
    connection_counter: Arc<AtomicU64>,
    max_message_size: usize,
    outbox_capacity: usize,
}

impl ConfigServer {
    /// Creates a new server.
    ///
    /// # Arguments
    ///
    /// * `config` - Addresses, dashboard path and limits
    /// * `registry` - Handle to the registry actor
    /// * `cancel_token` - Token for graceful shutdown
    pub fn new(config: ServerConfig, registry: RegistryHandle, cancel_token: CancellationToken) -> Self {
        Self {
            config,
            registry,
            cancel_token,
            connection_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Router for the WebSocket endpoint. Clients may upgrade at `/` or `/ws`.
    pub fn websocket_router(&self) -> Router {
        let context = SessionContext {
            registry: self.registry.clone(),
            cancel_token: self.cancel_token.clone(),
            connection_counter: Arc::clone(&self.connection_counter),
            max_message_size: self.config.max_message_size,
            outbox_capacity: self.config.outbox_capacity,
        };

        Router::new()
            .route("/", get(upgrade_handler))
            .route("/ws", get(upgrade_handler))
            .with_state(context)
    }

    /// Router for the dashboard endpoint.
    pub fn dashboard_router(&self) -> Router {
        dashboard::router(self.config.dashboard_path.clone())
    }

    /// Binds both configured addresses and serves until cancelled.
    pub async fn run(&self) -> Result<(), ServerError> {
        let ws_listener = bind(self.config.ws_addr).await?;
        let http_listener = bind(self.config.http_addr).await?;
        self.run_with_listeners(ws_listener, http_listener).await
    }

    /// Serves on already-bound listeners until the cancellation token fires.
    ///
    /// Returns once both endpoints have stopped.
    pub async fn run_with_listeners(
        &self,
        ws_listener: TcpListener,
        http_listener: TcpListener,
    ) -> Result<(), ServerError> {
        if let Ok(addr) = ws_listener.local_addr() {
            info!(addr = %addr, "WebSocket server listening");
        }
        if let Ok(addr) = http_listener.local_addr() {
            info!(
                addr = %addr,
                dashboard = %self.config.dashboard_path.display(),
                "Dashboard server listening"
            );
        }

        let ws_shutdown = self.cancel_token.clone();
        let ws = async {
            axum::serve(ws_listener, self.websocket_router())
                .with_graceful_shutdown(ws_shutdown.cancelled_owned())
                .await
        };

        let http_shutdown = self.cancel_token.clone();
        let http = async {
            axum::serve(http_listener, self.dashboard_router())
                .with_graceful_shutdown(http_shutdown.cancelled_owned())
                .await
        };

        let (ws_result, http_result) = tokio::join!(ws, http);
        ws_result.map_err(|e| ServerError::Serve {
            endpoint: "websocket",
            error: e.to_string(),
        })?;
        http_result.map_err(|e| ServerError::Serve {
            endpoint: "dashboard",
            error: e.to_string(),
        })?;

        info!("Server shutdown complete");
        Ok(())
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|e| ServerError::Bind {
        addr,
        error: e.to_string(),
    })
}

async fn upgrade_handler(State(context): State<SessionContext>, ws: WebSocketUpgrade) -> Response {
    let connection = ConnectionId::new(context.connection_counter.fetch_add(1, Ordering::Relaxed) + 1);

    ws.max_message_size(context.max_message_size)
        .on_upgrade(move |socket| {
            run_session(
                socket,
                connection,
                context.registry,
                context.outbox_capacity,
                context.cancel_token,
            )
        })
}

/// Errors that can occur in the server.
#[derive(Debug, Clone, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {error}")]
    Bind { addr: SocketAddr, error: String },

    #[error("{endpoint} server failed: {error}")]
    Serve { endpoint: &'static str, error: String },
}
