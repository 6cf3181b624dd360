//! Dashboard HTTP endpoint.
//!
//! Serves the dashboard page at `/` and `/index.html`. The file is read on
//! every request so edits show up on reload without restarting the server.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::warn;

/// Page served when the dashboard file cannot be read.
pub const MISSING_DASHBOARD_HTML: &str =
    "<html><body><h1>Error: dashboard.html not found</h1></body></html>";

#[derive(Clone)]
struct DashboardState {
    path: Arc<PathBuf>,
}

/// Builds the dashboard router for the file at `path`.
pub fn router(path: PathBuf) -> Router {
    let state = DashboardState {
        path: Arc::new(path),
    };

    Router::new()
        .route("/", get(serve_dashboard))
        .route("/index.html", get(serve_dashboard))
        .with_state(state)
}

async fn serve_dashboard(State(state): State<DashboardState>) -> Html<String> {
    match tokio::fs::read_to_string(state.path.as_ref()).await {
        Ok(html) => Html(html),
        Err(e) => {
            warn!(path = %state.path.display(), error = %e, "Failed to read dashboard file");
            Html(MISSING_DASHBOARD_HTML.to_string())
        }
    }
}
