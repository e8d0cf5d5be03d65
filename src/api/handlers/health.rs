//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Cache**: The cache directory exists and is writable
/// 2. **Extractor**: The `yt-dlp` binary runs
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "cache": { "status": "ok", "message": "Cache directory writable" },
///     "extractor": { "status": "ok", "message": "Extractor available" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (cache_ok, extractor_ok) =
        tokio::join!(state.store.health_check(), state.extractor.health_check());

    let cache = if cache_ok {
        CheckStatus::ok("Cache directory writable")
    } else {
        CheckStatus::error("Cache directory missing or read-only")
    };

    let extractor = if extractor_ok {
        CheckStatus::ok("Extractor available")
    } else {
        CheckStatus::error("Extractor could not be run")
    };

    let all_healthy = cache.is_ok() && extractor.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { cache, extractor },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
