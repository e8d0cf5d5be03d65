//! Filesystem-backed content store.

use crate::domain::errors::StoreError;
use crate::domain::gateways::ContentStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory under the store root that holds in-progress writes.
const STAGING_DIR: &str = ".staging";

/// Extension given to every published entry.
const DEFAULT_EXTENSION: &str = "mp4";

/// Content store keeping one file per key in a cache directory.
///
/// Writes land in `<root>/.staging/` first and are moved into place with a
/// rename, so a partially written file is never visible under its final
/// name. Entries never expire.
pub struct FsContentStore {
    root: PathBuf,
    extension: String,
}

impl FsContentStore {
    /// Opens a store rooted at `root`, creating the directory tree if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directories cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let staging = root.join(STAGING_DIR);

        tokio::fs::create_dir_all(&staging)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;

        info!("Content store ready at {}", root.display());

        Ok(Self {
            root,
            extension: DEFAULT_EXTENSION.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    fn file_name(&self, key: &str) -> String {
        format!("{}.{}", key, self.extension)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(self.file_name(key))
    }

    fn staging_path(&self, key: &str) -> PathBuf {
        let nonce: u64 = rand::random();
        self.staging_dir()
            .join(format!("{}.{:016x}.{}", key, nonce, self.extension))
    }

    async fn has(&self, key: &str) -> bool {
        match tokio::fs::metadata(self.path(key)).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<PathBuf, StoreError> {
        let staged = self.staging_path(key);
        let staging_dir = self.staging_dir();

        tokio::fs::create_dir_all(&staging_dir)
            .await
            .map_err(|e| StoreError::io(&staging_dir, e))?;

        if let Err(e) = tokio::fs::write(&staged, &bytes).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(StoreError::io(&staged, e));
        }

        self.adopt(key, &staged).await
    }

    async fn adopt(&self, key: &str, staged: &Path) -> Result<PathBuf, StoreError> {
        if !tokio::fs::try_exists(staged).await.unwrap_or(false) {
            return Err(StoreError::MissingStagedFile(staged.to_path_buf()));
        }

        let target = self.path(key);
        tokio::fs::rename(staged, &target)
            .await
            .map_err(|e| StoreError::io(&target, e))?;

        debug!("Stored {} -> {}", key, target.display());
        Ok(target)
    }

    async fn health_check(&self) -> bool {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(e) => {
                warn!("Content store root {} unavailable: {}", self.root.display(), e);
                false
            }
        }
    }
}
