//! Secret service implementation.
//!
//! Loads the Spotify client credentials from `secret.json`, falling back to
//! the `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET` environment variables
//! for any field the file leaves empty.
//!
//! Configuration priority: secret.json > environment variables

use crate::paths::NonstopPaths;
use crate::storage::{AtomicFile, FileFormat};
use nonstop_core::config::{SecretConfig, SpotifyCredentials};
use nonstop_core::secret::SecretService;
use nonstop_core::{NonstopError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env: EnvLookup,
}

impl SecretServiceImpl {
    /// Resolves `secret.json`, creating an empty 0600 template on first run.
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = NonstopPaths::new(base_dir).ensure_secret_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replaces the environment lookup (for testing).
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    fn load_file(&self) -> Result<SecretConfig> {
        let file = AtomicFile::<SecretConfig>::new(self.path.clone(), FileFormat::Json);
        Ok(file.load()?.unwrap_or_default())
    }

    fn env_value(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|value| !value.trim().is_empty())
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn spotify_credentials(&self) -> Result<SpotifyCredentials> {
        let from_file = self.load_file()?.spotify.unwrap_or_default();

        let client_id = if from_file.has_client_id() {
            from_file.client_id.clone()
        } else {
            self.env_value(CLIENT_ID_ENV).ok_or_else(|| {
                NonstopError::config(format!(
                    "Spotify client id not found in {} or {}",
                    self.path.display(),
                    CLIENT_ID_ENV
                ))
            })?
        };

        let client_secret = from_file
            .secret()
            .map(str::to_string)
            .or_else(|| self.env_value(CLIENT_SECRET_ENV));

        Ok(SpotifyCredentials::new(client_id, client_secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[tokio::test]
    async fn test_missing_everything_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path()))
            .unwrap()
            .with_env(no_env);

        let err = service.spotify_credentials().await.unwrap_err();
        assert!(matches!(err, NonstopError::Config(_)));
    }

    #[test]
    fn test_new_writes_private_template() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::new(Some(temp_dir.path())).unwrap();

        assert_eq!(service.path, temp_dir.path().join("secret.json"));
        let content = std::fs::read_to_string(&service.path).unwrap();
        assert!(content.contains("client_id"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&service.path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"spotify": {"client_id": "file-id", "client_secret": "file-secret"}}"#,
        )
        .unwrap();

        let creds = SecretServiceImpl::with_path(path)
            .with_env(|_| Some("env-value".to_string()))
            .spotify_credentials()
            .await
            .unwrap();
        assert_eq!(creds.client_id, "file-id");
        assert_eq!(creds.secret(), Some("file-secret"));
    }

    #[tokio::test]
    async fn test_env_fills_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"spotify": {"client_id": "file-id"}}"#).unwrap();

        let creds = SecretServiceImpl::with_path(path)
            .with_env(|name| match name {
                CLIENT_SECRET_ENV => Some("env-secret".to_string()),
                _ => None,
            })
            .spotify_credentials()
            .await
            .unwrap();
        assert_eq!(creds.client_id, "file-id");
        assert_eq!(creds.secret(), Some("env-secret"));
    }

    #[tokio::test]
    async fn test_env_only() {
        let temp_dir = TempDir::new().unwrap();
        let creds = SecretServiceImpl::new(Some(temp_dir.path()))
            .unwrap()
            .with_env(|name| match name {
                CLIENT_ID_ENV => Some("env-id".to_string()),
                _ => None,
            })
            .spotify_credentials()
            .await
            .unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert!(creds.secret().is_none());
    }

    #[tokio::test]
    async fn test_template_file_counts_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NonstopPaths::new(Some(temp_dir.path()));
        paths.ensure_secret_file().unwrap();

        let creds = SecretServiceImpl::new(Some(temp_dir.path()))
            .unwrap()
            .with_env(|name| match name {
                CLIENT_ID_ENV => Some("env-id".to_string()),
                CLIENT_SECRET_ENV => Some("env-secret".to_string()),
                _ => None,
            })
            .spotify_credentials()
            .await
            .unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.secret(), Some("env-secret"));
    }
}
