//! Catalog access with the app token: song search and track previews.

use crate::token_broker::TokenBroker;
use nonstop_core::spotify::{SpotifyApi, Track};
use nonstop_core::{NonstopError, Result};
use std::sync::Arc;

/// Result count requested per search.
pub const SEARCH_LIMIT: u32 = 10;

pub struct CatalogService {
    broker: Arc<TokenBroker>,
    api: Arc<dyn SpotifyApi>,
}

impl CatalogService {
    pub fn new(broker: Arc<TokenBroker>, api: Arc<dyn SpotifyApi>) -> Self {
        Self { broker, api }
    }

    /// Searches tracks. Any failure degrades to an empty list.
    pub async fn search_tracks(&self, query: &str) -> Vec<Track> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let Some(token) = self.broker.app_token().await else {
            tracing::warn!("Search skipped: no app token available");
            return Vec::new();
        };

        match self.api.search_tracks(&token, query, SEARCH_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::error!("Error searching Spotify: {}", e);
                if e == NonstopError::Unauthorized {
                    self.broker.clear_app_token().await;
                }
                Vec::new()
            }
        }
    }

    /// Returns the 30-second preview URL, or `None` when the track has none.
    pub async fn preview_url(&self, track_id: &str) -> Result<Option<String>> {
        let track_id = track_id.trim();
        if track_id.is_empty() || !track_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(NonstopError::InvalidInput(format!(
                "'{}' is not a Spotify track id",
                track_id
            )));
        }

        let token = self
            .broker
            .app_token()
            .await
            .ok_or(NonstopError::AppTokenUnavailable)?;

        match self.api.track(&token, track_id).await {
            Ok(track) => {
                if track.preview_url.is_none() {
                    tracing::info!("No preview available for track {}", track_id);
                }
                Ok(track.preview_url)
            }
            Err(e) => {
                tracing::error!("Error fetching preview URL: {}", e);
                if e == NonstopError::Unauthorized {
                    self.broker.clear_app_token().await;
                }
                Err(e)
            }
        }
    }
}
