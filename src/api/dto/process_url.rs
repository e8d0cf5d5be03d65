//! DTOs for the URL processing endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to process a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ProcessUrlRequest {
    /// The URL to process (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Successful processing result.
///
/// `data` carries the Markdown reply text, or `null` when the pipeline has
/// nothing to say about the URL.
#[derive(Debug, Serialize)]
pub struct ProcessUrlResponse {
    pub status: &'static str,
    pub data: Option<String>,
}

impl ProcessUrlResponse {
    pub fn success(data: Option<String>) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}
