//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and caches it. A missing
//! file is created with the defaults so the user has something to edit.

use crate::paths::NonstopPaths;
use crate::storage::{AtomicFile, FileFormat};
use nonstop_core::Result;
use nonstop_core::config::RootConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = NonstopPaths::new(base_dir).config_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        let file = AtomicFile::<RootConfig>::new(self.path.clone(), FileFormat::Toml);
        match file.load()? {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                if let Err(e) = file.save(&default_config) {
                    tracing::warn!(
                        "Could not write default config to {}: {}",
                        self.path.display(),
                        e
                    );
                } else {
                    tracing::info!("Created default config at {}", self.path.display());
                }
                Ok(default_config)
            }
        }
    }
}
