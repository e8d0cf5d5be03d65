//! Cached, coalesced media downloads.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};

use crate::domain::errors::{ExtractionError, FetchError};
use crate::domain::gateways::{ContentStore, MediaExtractor};
use crate::utils::cache_key::sanitize_key;

type FetchFuture = BoxFuture<'static, Result<PathBuf, FetchError>>;
type InFlight = Arc<Mutex<HashMap<String, WeakShared<FetchFuture>>>>;

/// Downloads media through a [`MediaExtractor`] into a [`ContentStore`].
///
/// # Idempotence
///
/// A URL whose sanitized key is already stored is served from the store
/// without touching the extractor.
///
/// # Coalescing
///
/// At most one extraction runs per key. Concurrent callers for the same key
/// await the same in-flight download and receive the same result. The
/// in-flight table only holds weak handles: when every caller has gone away
/// the download future is dropped, which cancels the extraction and removes
/// its staging file.
pub struct MediaFetcher {
    extractor: Arc<dyn MediaExtractor>,
    store: Arc<dyn ContentStore>,
    in_flight: InFlight,
}

impl MediaFetcher {
    pub fn new(extractor: Arc<dyn MediaExtractor>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            extractor,
            store,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Name under which the entry for `url` is published by the store.
    pub fn file_name(&self, url: &str) -> String {
        self.store.file_name(&sanitize_key(url))
    }

    /// Returns the local path of the media behind `url`, downloading it if
    /// it is not cached yet.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Unsupported`] if the URL is not a media source
    /// - [`FetchError::ProcessingFailed`] if post-processing failed
    /// - [`FetchError::DownloadFailed`] for any other failure, with a user-safe message
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        let key = sanitize_key(url);

        if self.store.has(&key).await {
            info!("File already exists for URL: {}, skipping download.", url);
            return Ok(self.store.path(&key));
        }

        self.join_or_start(&key, url).await
    }

    fn join_or_start(&self, key: &str, url: &str) -> Shared<FetchFuture> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = in_flight.get(key).and_then(WeakShared::upgrade) {
            debug!(key, "Joining in-flight download");
            return existing;
        }

        let download = download(
            self.extractor.clone(),
            self.store.clone(),
            self.in_flight.clone(),
            key.to_string(),
            url.to_string(),
        )
        .boxed()
        .shared();

        // Downloads whose callers all went away never reach their own cleanup.
        in_flight.retain(|_, weak| weak.upgrade().is_some());
        if let Some(weak) = download.downgrade() {
            in_flight.insert(key.to_string(), weak);
        }

        download
    }
}

async fn download(
    extractor: Arc<dyn MediaExtractor>,
    store: Arc<dyn ContentStore>,
    in_flight: InFlight,
    key: String,
    url: String,
) -> Result<PathBuf, FetchError> {
    let result = extract_into_store(extractor.as_ref(), store.as_ref(), &key, &url).await;

    in_flight
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&key);

    result
}

async fn extract_into_store(
    extractor: &dyn MediaExtractor,
    store: &dyn ContentStore,
    key: &str,
    url: &str,
) -> Result<PathBuf, FetchError> {
    // A previous download may have finished between the caller's cache check
    // and this one starting.
    if store.has(key).await {
        return Ok(store.path(key));
    }

    let staging = StagingFile::new(store.staging_path(key));

    let produced = extractor
        .extract(url, staging.path())
        .await
        .map_err(|e| classify(url, e))?;
    let _produced = StagingFile::new(produced.clone());

    let path = store.adopt(key, &produced).await.map_err(|e| {
        error!("Failed to store download for URL: {} - {}", url, e);
        FetchError::DownloadFailed(format!(
            "An unexpected error occurred while processing the URL: {url}. Please try again later."
        ))
    })?;

    info!("Download successful for URL: {}", url);
    Ok(path)
}

fn classify(url: &str, error: ExtractionError) -> FetchError {
    match error {
        ExtractionError::UnsupportedUrl(_) => {
            info!("Unsupported URL: {}", url);
            FetchError::Unsupported(url.to_string())
        }
        ExtractionError::PostProcessing(detail) => {
            error!("PostProcessingError for URL: {} - {}", url, detail);
            FetchError::ProcessingFailed(format!(
                "An error occurred while processing the video file for URL: {url}."
            ))
        }
        ExtractionError::Failed(detail) => {
            error!("DownloadError for URL: {} - {}", url, detail);
            FetchError::DownloadFailed(format!(
                "Failed to download video from URL: {url}. Check if the URL is correct and accessible."
            ))
        }
    }
}

/// Removes a staged file when dropped, unless it was already moved away.
struct StagingFile(PathBuf);

impl StagingFile {
    fn new(path: PathBuf) -> Self {
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StoreError;
    use crate::domain::gateways::{MockContentStore, MockMediaExtractor};
    use crate::infrastructure::store::FsContentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    const URL: &str = "https://v.com/clip/1";
    const KEY: &str = "https___v_com_clip_1";

    /// Extractor that writes a small file after a delay and counts calls.
    struct SlowExtractor {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl SlowExtractor {
        fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaExtractor for SlowExtractor {
        async fn extract(
            &self,
            _url: &str,
            destination: &Path,
        ) -> Result<PathBuf, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            tokio::fs::write(destination, b"media")
                .await
                .map_err(|e| ExtractionError::Failed(e.to_string()))?;
            Ok(destination.to_path_buf())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    fn empty_store() -> MockContentStore {
        let mut store = MockContentStore::new();
        store.expect_has().returning(|_| false);
        store
            .expect_staging_path()
            .returning(|key| PathBuf::from(format!("/nonexistent/.staging/{key}.part.mp4")));
        store
    }

    fn failing_extractor(error: ExtractionError) -> MockMediaExtractor {
        let mut extractor = MockMediaExtractor::new();
        extractor
            .expect_extract()
            .times(1)
            .returning(move |_, _| Err(error.clone()));
        extractor
    }

    #[tokio::test]
    async fn test_cache_hit_skips_extraction() {
        let mut store = MockContentStore::new();
        store.expect_has().returning(|_| true);
        store
            .expect_path()
            .returning(|key| PathBuf::from(format!("/cache/{key}.mp4")));

        let mut extractor = MockMediaExtractor::new();
        extractor.expect_extract().times(0);

        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(store));
        let path = fetcher.fetch(URL).await.unwrap();

        assert_eq!(path, PathBuf::from(format!("/cache/{KEY}.mp4")));
    }

    #[tokio::test]
    async fn test_successful_download_is_adopted() {
        let mut store = empty_store();
        store
            .expect_adopt()
            .withf(|key, _| key == KEY)
            .times(1)
            .returning(|key, _| Ok(PathBuf::from(format!("/cache/{key}.mp4"))));

        let mut extractor = MockMediaExtractor::new();
        extractor
            .expect_extract()
            .withf(|url, _| url == URL)
            .times(1)
            .returning(|_, destination| Ok(destination.to_path_buf()));

        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(store));
        let path = fetcher.fetch(URL).await.unwrap();

        assert_eq!(path, PathBuf::from(format!("/cache/{KEY}.mp4")));
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        let extractor = failing_extractor(ExtractionError::UnsupportedUrl("nope".into()));
        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(empty_store()));

        let result = fetcher.fetch(URL).await;

        assert_eq!(result, Err(FetchError::Unsupported(URL.to_string())));
    }

    #[tokio::test]
    async fn test_post_processing_failure() {
        let extractor = failing_extractor(ExtractionError::PostProcessing("ffmpeg".into()));
        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(empty_store()));

        let result = fetcher.fetch(URL).await;

        assert!(matches!(result, Err(FetchError::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_download_failure_hides_detail() {
        let extractor = failing_extractor(ExtractionError::Failed(
            "HTTP Error 403 at /secret/token".into(),
        ));
        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(empty_store()));

        let Err(FetchError::DownloadFailed(message)) = fetcher.fetch(URL).await else {
            panic!("expected DownloadFailed");
        };

        assert!(message.contains(URL));
        assert!(!message.contains("secret"));
    }

    #[tokio::test]
    async fn test_store_failure_is_download_failure() {
        let mut store = empty_store();
        store
            .expect_adopt()
            .returning(|_, staged| Err(StoreError::MissingStagedFile(staged.to_path_buf())));

        let mut extractor = MockMediaExtractor::new();
        extractor
            .expect_extract()
            .returning(|_, destination| Ok(destination.to_path_buf()));

        let fetcher = MediaFetcher::new(Arc::new(extractor), Arc::new(store));

        assert!(matches!(
            fetcher.fetch(URL).await,
            Err(FetchError::DownloadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_second_fetch_uses_cache() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::ZERO));
        let fetcher = MediaFetcher::new(extractor.clone(), store);

        let first = fetcher.fetch(URL).await.unwrap();
        let second = fetcher.fetch(URL).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(extractor.calls(), 1);
        assert_eq!(first, dir.path().join(format!("{KEY}.mp4")));
    }

    #[tokio::test]
    async fn test_concurrent_fetches_are_coalesced() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::from_millis(50)));
        let fetcher = MediaFetcher::new(extractor.clone(), store);

        let (a, b, c) = tokio::join!(fetcher.fetch(URL), fetcher.fetch(URL), fetcher.fetch(URL));

        assert_eq!(extractor.calls(), 1);
        assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
        assert_eq!(b.unwrap(), c.unwrap());
    }

    #[tokio::test]
    async fn test_distinct_urls_download_separately() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::from_millis(10)));
        let fetcher = MediaFetcher::new(extractor.clone(), store);

        let (a, b) = tokio::join!(fetcher.fetch(URL), fetcher.fetch("https://v.com/clip/2"));

        assert_eq!(extractor.calls(), 2);
        assert_ne!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn test_cancelled_fetch_publishes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::from_secs(5)));
        let fetcher = MediaFetcher::new(extractor.clone(), store.clone());

        let cancelled = tokio::time::timeout(Duration::from_millis(20), fetcher.fetch(URL)).await;
        assert!(cancelled.is_err());

        assert!(!store.has(KEY).await);
        let staged = std::fs::read_dir(dir.path().join(".staging")).unwrap().count();
        assert_eq!(staged, 0);
    }

    #[tokio::test]
    async fn test_abandoned_downloads_are_pruned() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::from_secs(5)));
        let fetcher = MediaFetcher::new(extractor, store);

        for i in 0..3 {
            let url = format!("https://v.com/clip/{i}");
            let cancelled = tokio::time::timeout(Duration::from_millis(20), fetcher.fetch(&url)).await;
            assert!(cancelled.is_err());
        }

        let in_flight = fetcher.in_flight.lock().unwrap();
        assert_eq!(in_flight.len(), 1);
        assert!(in_flight.contains_key("https___v_com_clip_2"));
    }

    #[tokio::test]
    async fn test_timed_out_caller_leaves_shared_download_running() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FsContentStore::open(dir.path()).await.unwrap());
        let extractor = Arc::new(SlowExtractor::new(Duration::from_millis(100)));
        let fetcher = MediaFetcher::new(extractor.clone(), store.clone());

        let (impatient, patient) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(20), fetcher.fetch(URL)),
            tokio::time::timeout(Duration::from_secs(5), fetcher.fetch(URL)),
        );

        assert!(impatient.is_err());
        assert_eq!(
            patient.unwrap().unwrap(),
            dir.path().join(format!("{KEY}.mp4"))
        );
        assert_eq!(extractor.calls(), 1);
        assert!(store.has(KEY).await);
    }

    #[tokio::test]
    async fn test_file_name_uses_sanitized_key() {
        let mut store = MockContentStore::new();
        store
            .expect_file_name()
            .returning(|key| format!("{key}.mp4"));

        let fetcher = MediaFetcher::new(Arc::new(MockMediaExtractor::new()), Arc::new(store));

        assert_eq!(fetcher.file_name(URL), format!("{KEY}.mp4"));
    }
}
