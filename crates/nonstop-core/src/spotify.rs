//! Spotify domain models and the remote API seams.
//!
//! The traits here are implemented over HTTP in `nonstop-interaction` and
//! by recording fakes in tests.

use crate::config::SpotifyCredentials;
use crate::error::Result;
use crate::token::SessionToken;
use serde::{Deserialize, Serialize};

/// Token endpoint response (`POST /api/token`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Outcome of an authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResponse {
    Token {
        access_token: String,
        token_type: Option<String>,
        expires_in: Option<u64>,
        scope: Option<String>,
        state: Option<String>,
    },
    Error {
        error: String,
        description: Option<String>,
        state: Option<String>,
    },
}

impl AuthorizationResponse {
    pub fn state(&self) -> Option<&str> {
        match self {
            AuthorizationResponse::Token { state, .. } | AuthorizationResponse::Error { state, .. } => {
                state.as_deref()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// `GET /v1/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl SpotifyProfile {
    /// Display name, falling back to the user id.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn album_cover(&self) -> Option<&str> {
        self.album.images.first().map(|image| image.url.as_str())
    }
}

/// Spotify accounts service (token endpoint).
#[async_trait::async_trait]
pub trait AccountsApi: Send + Sync {
    /// Exchanges client credentials for an app-scoped token.
    async fn client_credentials(&self, credentials: &SpotifyCredentials) -> Result<TokenGrant>;
}

/// Spotify Web API.
#[async_trait::async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_profile(&self, token: &SessionToken) -> Result<SpotifyProfile>;

    async fn search_tracks(
        &self,
        token: &SessionToken,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>>;

    async fn track(&self, token: &SessionToken, track_id: &str) -> Result<Track>;
}

/// Presents an authorization URL to the user and waits for the redirect.
///
/// Desktop shells open a browser; the CLI prints the URL and reads the
/// redirect back from the terminal.
#[async_trait::async_trait]
pub trait AuthorizationPrompt: Send + Sync {
    /// Returns the full redirect URL the provider sent the user to.
    async fn authorize(&self, authorize_url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_helpers() {
        let track: Track = serde_json::from_str(
            r#"{
                "id": "t1",
                "name": "Song",
                "artists": [{"name": "A"}, {"name": "B"}],
                "album": {"name": "LP", "images": [{"url": "https://i/1"}, {"url": "https://i/2"}]},
                "preview_url": null
            }"#,
        )
        .unwrap();
        assert_eq!(track.artist_names(), "A, B");
        assert_eq!(track.album_cover(), Some("https://i/1"));
        assert!(track.preview_url.is_none());
    }

    #[test]
    fn test_profile_name_falls_back_to_id() {
        let profile: SpotifyProfile =
            serde_json::from_str(r#"{"id": "user42", "display_name": null}"#).unwrap();
        assert_eq!(profile.name(), "user42");
    }
}
