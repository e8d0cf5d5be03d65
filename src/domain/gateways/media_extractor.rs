//! Gateway trait for the external media extraction tool.

use crate::domain::errors::ExtractionError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Downloads the media behind a URL into a local file.
///
/// # Implementations
///
/// - [`crate::infrastructure::extractor::YtDlpExtractor`] - `yt-dlp` subprocess
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Downloads the media for `url` to `destination`.
    ///
    /// Returns the path of the file actually written, which callers hand to
    /// [`crate::domain::gateways::ContentStore::adopt`].
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::UnsupportedUrl`] if the URL is not a media source
    /// - [`ExtractionError::PostProcessing`] if the download succeeded but processing failed
    /// - [`ExtractionError::Failed`] for anything else
    async fn extract(&self, url: &str, destination: &Path) -> Result<PathBuf, ExtractionError>;

    /// Returns true if the extraction tool can be invoked.
    async fn health_check(&self) -> bool;
}
