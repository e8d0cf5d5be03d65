//! API route configuration.

use crate::api::handlers::{health_handler, process_url_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public API routes.
///
/// # Endpoints
///
/// - `POST /process_url` - Run the relay pipeline for one URL
/// - `GET  /health`      - Cache and extractor health
///
/// Trailing slashes are trimmed before routing, so `/process_url/` matches.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/process_url", post(process_url_handler))
        .route("/health", get(health_handler))
}
