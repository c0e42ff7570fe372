//! File-backed secure store.
//!
//! Keeps every key in one JSON object at `~/.config/nonstop/secure_store.json`,
//! readable only by its owner. This is the desktop stand-in for a platform
//! keychain: values are plain text on disk, protected by file permissions.

use super::atomic_file::{AtomicFile, AtomicFileError, FileFormat};
use crate::paths::NonstopPaths;
use nonstop_core::secure_store::SecureStore;
use nonstop_core::{NonstopError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileSecureStore {
    path: PathBuf,
}

impl FileSecureStore {
    /// Creates a store at the default location (or under `base_dir`).
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = NonstopPaths::new(base_dir).secure_store_file()?;
        Ok(Self { path })
    }

    /// Creates a store backed by an explicit file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(path: PathBuf) -> AtomicFile<Entries> {
        AtomicFile::new(path, FileFormat::Json).private()
    }

    /// Runs a blocking file operation off the async executor.
    async fn blocking<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(AtomicFile<Entries>) -> std::result::Result<R, AtomicFileError> + Send + 'static,
        R: Send + 'static,
    {
        let file = Self::file(self.path.clone());
        tokio::task::spawn_blocking(move || op(file))
            .await
            .map_err(|e| NonstopError::storage(format!("Secure store task failed: {}", e)))?
            .map_err(|e| NonstopError::storage(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SecureStore for FileSecureStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| Ok(file.load()?.and_then(|mut entries| entries.remove(&key))))
            .await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.blocking(move |file| {
            file.update(Entries::new(), |entries| {
                entries.insert(key, value);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("Secure store updated: {}", self.path.display());
        Ok(())
    }

    async fn delete_item(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |file| {
            if file.load()?.is_none() {
                return Ok(());
            }
            file.update(Entries::new(), |entries| {
                entries.remove(&key);
                Ok(())
            })
        })
        .await
    }
}
