//! Secret management service trait.
//!
//! Defines the interface for loading the Spotify client credentials.

use crate::config::SpotifyCredentials;
use crate::error::Result;

/// Service for loading application credentials.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secret files have appropriate permissions (e.g., 600 on Unix)
/// - Secrets are never logged or exposed in error messages
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the Spotify credentials.
    ///
    /// Returns `NonstopError::Config` when no client id can be found.
    async fn spotify_credentials(&self) -> Result<SpotifyCredentials>;
}
