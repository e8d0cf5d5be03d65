//! Handler for the URL processing endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::process_url::{ProcessUrlRequest, ProcessUrlResponse};
use crate::domain::entities::{ProcessingOutcome, UrlCandidate};
use crate::error::AppError;
use crate::state::AppState;

/// Runs the relay pipeline for one URL.
///
/// # Endpoint
///
/// `POST /process_url/`
///
/// The URL is processed as a direct (one-to-one) request, so it never
/// resolves to silence: the response always carries a reply text unless the
/// pipeline has nothing at all to report.
///
/// # Request Body
///
/// ```json
/// { "url": "https://x.com/user/status/1" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "success",
///   "data": "Here is an alternative link, which Telegram may parse better: ..."
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed, the URL is invalid, or
/// processing produced an error outcome.
pub async fn process_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessUrlRequest>, JsonRejection>,
) -> Result<Json<ProcessUrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(|errors| {
        AppError::from(errors).with_message(format!("Invalid URL provided: {}", payload.url))
    })?;

    let candidate = UrlCandidate::parse(&payload.url).map_err(|e| {
        AppError::bad_request(
            format!("Invalid URL provided: {}", payload.url),
            json!({ "reason": e.to_string() }),
        )
    })?;

    match state.orchestrator.process(candidate.as_str(), false).await {
        ProcessingOutcome::Error(message) => Err(AppError::internal(
            message,
            json!({ "url": candidate.as_str() }),
        )),
        outcome => Ok(Json(ProcessUrlResponse::success(outcome.text()))),
    }
}
