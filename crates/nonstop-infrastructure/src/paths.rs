//! Unified path management for nonstop configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/nonstop/           # Config directory (platform config dir)
//! ├── config.toml              # Spotify endpoints, redirect, scopes
//! ├── secret.json              # Spotify client id / secret
//! └── secure_store.json        # Persisted session token (mode 600)
//! ```
//!
//! Every path can be re-rooted with a base directory (`--config-dir`, tests).

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "nonstop";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for nonstop_core::NonstopError {
    fn from(err: PathError) -> Self {
        nonstop_core::NonstopError::config(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NonstopPaths {
    base_dir: Option<PathBuf>,
}

impl NonstopPaths {
    /// Creates a path resolver. `None` uses the platform config directory.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the nonstop configuration directory.
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/nonstop/`, or the base directory
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn secure_store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secure_store.json"))
    }

    /// Ensures the secret file exists, creating an empty template if it doesn't.
    ///
    /// The template is written with permissions 600 on Unix so that the user
    /// can paste the credentials in place.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use nonstop_core::config::{SecretConfig, SpotifyCredentials};

        let template_config = SecretConfig {
            spotify: Some(SpotifyCredentials::new("", Some(String::new()))),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(std::io::Error::other)?;

        std::fs::write(&secret_path, template_json)?;
        restrict_permissions(&secret_path)?;

        Ok(secret_path)
    }
}

/// Sets file permissions to 600 (user read/write only) on Unix.
pub(crate) fn restrict_permissions(path: &Path) -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
