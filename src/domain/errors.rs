//! Typed failures raised by the relay's collaborators.

use std::path::PathBuf;

/// Failure to fetch media for a URL, as seen by the orchestrator.
///
/// Every variant drives the same fallback-link response; the distinction only
/// matters for logging. `Clone` lets coalesced callers share one result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The URL is not a media source the extractor understands.
    #[error("Unsupported URL: {0}")]
    Unsupported(String),

    /// Network or unexpected failure; the message is safe to show to users.
    #[error("{0}")]
    DownloadFailed(String),

    /// Media was fetched but post-processing (e.g. transcoding) failed.
    #[error("{0}")]
    ProcessingFailed(String),
}

/// Raw failure reported by a [`crate::domain::gateways::MediaExtractor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("post-processing failed: {0}")]
    PostProcessing(String),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// Failure of a [`crate::domain::gateways::ContentStore`] operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("staged file {0} does not exist")]
    MissingStagedFile(PathBuf),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Non-recoverable failure of a [`crate::domain::gateways::RedirectResolver`].
///
/// Timeouts are not errors: resolvers fall back to the input URL instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("redirect request failed: {0}")]
    Request(String),
}
