//! SpotifyWebClient - the handful of Web API endpoints the app uses.

use crate::http;
use async_trait::async_trait;
use nonstop_core::config::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS, SpotifyConfig};
use nonstop_core::spotify::{SpotifyApi, SpotifyProfile, Track};
use nonstop_core::{Result, SessionToken};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Track>,
}

#[derive(Clone)]
pub struct SpotifyWebClient {
    client: Client,
    api_url: String,
    timeout: Duration,
}

impl SpotifyWebClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn from_config(client: Client, config: &SpotifyConfig) -> Self {
        Self::with_client(client, config.api_url.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn get(&self, path: &str, token: &SessionToken) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!("GET {} ({} token)", url, token.kind);
        self.client
            .get(url)
            .header(AUTHORIZATION, token.bearer_header())
            .timeout(self.timeout)
    }
}

impl Default for SpotifyWebClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl SpotifyApi for SpotifyWebClient {
    async fn current_profile(&self, token: &SessionToken) -> Result<SpotifyProfile> {
        let response = self
            .get("/v1/me", token)
            .send()
            .await
            .map_err(|e| http::network_error("Profile request failed", e))?;

        http::parse_response("Fetching Spotify profile", response).await
    }

    async fn search_tracks(
        &self,
        token: &SessionToken,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>> {
        let limit = limit.to_string();
        let response = self
            .get("/v1/search", token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| http::network_error("Search request failed", e))?;

        let body: SearchResponse = http::parse_response("Searching Spotify", response).await?;
        Ok(body.tracks.map(|page| page.items).unwrap_or_default())
    }

    async fn track(&self, token: &SessionToken, track_id: &str) -> Result<Track> {
        let response = self
            .get(&format!("/v1/tracks/{}", track_id), token)
            .send()
            .await
            .map_err(|e| http::network_error("Track request failed", e))?;

        http::parse_response("Fetching track", response).await
    }
}
