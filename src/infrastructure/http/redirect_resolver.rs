//! Redirect resolution over HTTP HEAD requests.

use crate::domain::entities::{Resolution, ResolvedUrl};
use crate::domain::errors::ResolveError;
use crate::domain::gateways::RedirectResolver;
use crate::utils::url_normalizer::strip_query;
use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of redirects followed for one URL.
const MAX_REDIRECTS: usize = 10;

/// Resolves redirects with a single HEAD request per URL.
///
/// The final URL after all redirects has its query stripped. Response
/// status codes are not inspected: a 404 at the end of a redirect chain is
/// still the canonical location.
#[derive(Clone)]
pub struct HttpRedirectResolver {
    client: Client,
}

impl HttpRedirectResolver {
    /// Builds a resolver with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("url-fairy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectResolver for HttpRedirectResolver {
    async fn resolve(&self, url: &str, timeout: Duration) -> Result<ResolvedUrl, ResolveError> {
        let response = match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("Timeout for URL: {} after {:?}", url, timeout);
                return Ok(ResolvedUrl::fallback(url, Resolution::TimedOut));
            }
            Err(e) => return Err(ResolveError::Request(e.to_string())),
        };

        let final_url = response.url().as_str();
        match strip_query(final_url) {
            Ok(resolved) => {
                debug!("Resolved {} -> {}", url, resolved);
                Ok(ResolvedUrl::followed(resolved))
            }
            Err(e) => {
                warn!("Invalid redirect URL: {} ({})", final_url, e);
                Ok(ResolvedUrl::fallback(url, Resolution::Malformed))
            }
        }
    }
}
