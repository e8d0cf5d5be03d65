#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use url_fairy::application::services::{
    DomainPolicy, LinkRewriter, MediaFetcher, OrchestratorSettings, RequestOrchestrator,
};
use url_fairy::domain::entities::ResolvedUrl;
use url_fairy::domain::errors::{ExtractionError, ResolveError};
use url_fairy::domain::gateways::{MediaExtractor, RedirectResolver};
use url_fairy::infrastructure::store::FsContentStore;
use url_fairy::state::AppState;

pub const BASE_URL: &str = "media.example.org";

/// Resolves URLs from a fixed table; unknown URLs resolve to themselves.
#[derive(Default)]
pub struct StubResolver {
    redirects: HashMap<String, String>,
}

impl StubResolver {
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }
}

#[async_trait]
impl RedirectResolver for StubResolver {
    async fn resolve(&self, url: &str, _timeout: Duration) -> Result<ResolvedUrl, ResolveError> {
        let target = self.redirects.get(url).map_or(url, String::as_str);
        Ok(ResolvedUrl::followed(target))
    }
}

/// Extractor that writes a fixed payload and counts its invocations.
pub struct CountingExtractor {
    calls: AtomicUsize,
    failure: Option<ExtractionError>,
    delay: Duration,
    healthy: bool,
}

impl CountingExtractor {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: None,
            delay: Duration::ZERO,
            healthy: true,
        }
    }

    pub fn failing(failure: ExtractionError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::succeeding()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaExtractor for CountingExtractor {
    async fn extract(&self, _url: &str, destination: &Path) -> Result<PathBuf, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        tokio::fs::write(destination, b"media")
            .await
            .map_err(|e| ExtractionError::Failed(e.to_string()))?;

        Ok(destination.to_path_buf())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

/// Builds application state over a temporary cache directory.
///
/// The returned [`TempDir`] must be kept alive for the duration of the test.
pub async fn create_test_state(
    resolver: StubResolver,
    extractor: Arc<CountingExtractor>,
    allowed_domains: &[&str],
) -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());

    let orchestrator = RequestOrchestrator::new(
        Arc::new(resolver),
        DomainPolicy::new(allowed_domains),
        LinkRewriter::new(),
        MediaFetcher::new(extractor.clone(), store.clone()),
        OrchestratorSettings {
            base_url: BASE_URL.to_string(),
            redirect_timeout: Duration::from_secs(1),
            download_timeout: Duration::from_secs(5),
        },
    );

    (
        AppState::new(Arc::new(orchestrator), extractor, store),
        dir,
    )
}
