//! Gateway trait for the content-addressed media cache.

use crate::domain::errors::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Content-addressed media cache keyed by sanitized URL.
///
/// One file per key, no eviction. Entries become visible only once complete:
/// writers stage data under [`ContentStore::staging_path`] and publish it with
/// [`ContentStore::adopt`], or hand the bytes to [`ContentStore::put`].
///
/// # Implementations
///
/// - [`crate::infrastructure::store::FsContentStore`] - Files in a cache directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Name of the published file for `key`, relative to the store root.
    fn file_name(&self, key: &str) -> String;

    /// Absolute path of the published entry for `key`.
    fn path(&self, key: &str) -> PathBuf;

    /// Returns a fresh, unique path where an entry for `key` may be staged.
    fn staging_path(&self, key: &str) -> PathBuf;

    /// Returns true if a complete entry exists for `key`.
    async fn has(&self, key: &str) -> bool;

    /// Atomically stores `bytes` as the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if writing or renaming fails.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<PathBuf, StoreError>;

    /// Publishes an already staged file as the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingStagedFile`] if `staged` does not exist and
    /// [`StoreError::Io`] if the rename fails.
    async fn adopt(&self, key: &str, staged: &Path) -> Result<PathBuf, StoreError>;

    /// Returns true if the store root is usable.
    async fn health_check(&self) -> bool;
}
