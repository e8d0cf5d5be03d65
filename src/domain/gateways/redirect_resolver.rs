//! Gateway trait for redirect resolution.

use crate::domain::entities::ResolvedUrl;
use crate::domain::errors::ResolveError;
use async_trait::async_trait;
use std::time::Duration;

/// Follows HTTP redirects for a URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpRedirectResolver`] - reqwest HEAD requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    /// Resolves `url` to its final redirect target with the query stripped.
    ///
    /// Makes a single attempt. A timeout or a malformed target is not an
    /// error: the input URL is returned as a fallback [`ResolvedUrl`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Request`] when the request fails for any other
    /// reason (DNS, connection refused, TLS).
    async fn resolve(&self, url: &str, timeout: Duration) -> Result<ResolvedUrl, ResolveError>;
}
