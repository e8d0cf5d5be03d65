//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /process_url/` - Run the relay pipeline for one URL
//! - `GET  /health`       - Cache and extractor health
//! - `GET  /{file}`       - Cached media (only with `SERVE_MEDIA=true`);
//!   dot-prefixed paths such as the staging directory answer 404
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `media_dir` - when set, unmatched paths are served from this directory
///   so hosted media links can point at this process directly
pub fn app_router(state: AppState, media_dir: Option<PathBuf>) -> NormalizePath<Router> {
    let mut router = Router::new().merge(api::routes::routes());

    if let Some(dir) = media_dir {
        let media = Router::new()
            .fallback_service(ServeDir::new(dir))
            .layer(middleware::from_fn(hide_dot_paths));
        router = router.fallback_service(media);
    }

    let router = router.with_state(state).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Rejects paths with a dot-prefixed segment, encoded or not.
async fn hide_dot_paths(request: Request, next: Next) -> Response {
    let hidden = request.uri().path().split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    });

    if hidden {
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(request).await
}
