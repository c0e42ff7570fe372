//! SpotifyAccountsClient - token endpoint of the Spotify accounts service.

use crate::http;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nonstop_core::config::{DEFAULT_ACCOUNTS_URL, DEFAULT_REQUEST_TIMEOUT_SECS, SpotifyConfig, SpotifyCredentials};
use nonstop_core::spotify::{AccountsApi, TokenGrant};
use nonstop_core::{NonstopError, Result};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

const CLIENT_CREDENTIALS_BODY: &str = "grant_type=client_credentials";

#[derive(Clone)]
pub struct SpotifyAccountsClient {
    client: Client,
    accounts_url: String,
    timeout: Duration,
}

impl SpotifyAccountsClient {
    pub fn new(accounts_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), accounts_url)
    }

    /// Reuses an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: Client, accounts_url: impl Into<String>) -> Self {
        Self {
            client,
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn from_config(client: Client, config: &SpotifyConfig) -> Self {
        Self::with_client(client, config.accounts_url.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", client_id, client_secret))
        )
    }
}

impl Default for SpotifyAccountsClient {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNTS_URL)
    }
}

#[async_trait]
impl AccountsApi for SpotifyAccountsClient {
    async fn client_credentials(&self, credentials: &SpotifyCredentials) -> Result<TokenGrant> {
        let client_secret = credentials.secret().ok_or_else(|| {
            NonstopError::config("Spotify client secret is required for client credentials")
        })?;

        tracing::debug!("Requesting client-credentials token from {}", self.token_url());

        let response = self
            .client
            .post(self.token_url())
            .header(
                AUTHORIZATION,
                Self::basic_auth_header(&credentials.client_id, client_secret),
            )
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(CLIENT_CREDENTIALS_BODY)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| http::network_error("Token request failed", e))?;

        http::parse_response("Token request", response).await
    }
}
