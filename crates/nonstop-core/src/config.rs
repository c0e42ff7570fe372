//! Configuration models.
//!
//! `RootConfig` mirrors `config.toml`; `SecretConfig` mirrors `secret.json`.
//! Client credentials only ever come from the latter (or the environment),
//! never from source.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_REDIRECT_URI: &str = "nonstop://spotify-auth";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Scopes requested by the interactive login.
pub const DEFAULT_SCOPES: [&str; 4] = [
    "user-read-private",
    "user-read-email",
    "user-read-currently-playing",
    "user-read-playback-state",
];

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SpotifyConfig {
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_show_dialog")]
    pub show_dialog: bool,
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            show_dialog: default_show_dialog(),
            accounts_url: default_accounts_url(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_show_dialog() -> bool {
    true
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Root structure of secret.json
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SecretConfig {
    #[serde(default)]
    pub spotify: Option<SpotifyCredentials>,
}

/// Spotify application credentials.
///
/// `client_secret` is only needed for the client-credentials flow; the
/// interactive login works with the client id alone.
#[derive(Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SpotifyCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl SpotifyCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
        }
    }

    pub fn has_client_id(&self) -> bool {
        !self.client_id.trim().is_empty()
    }

    /// Returns the secret when it is present and non-blank.
    pub fn secret(&self) -> Option<&str> {
        self.client_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
