//! Session service: the user-token side of the app.
//!
//! Validates the stored token against `GET /v1/me`, remembers which Spotify
//! user is logged in, and handles logout.

use crate::event::BrokerEvent;
use crate::token_broker::TokenBroker;
use chrono::{DateTime, Utc};
use nonstop_core::secure_store::SecureStore;
use nonstop_core::spotify::{AuthorizationPrompt, SpotifyApi, SpotifyProfile};
use nonstop_core::token::SPOTIFY_USER_ID_KEY;
use nonstop_core::{NonstopError, Result, UserNotice};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedOut,
    Active { expires_at: Option<DateTime<Utc>> },
    Expired { expired_at: DateTime<Utc> },
}

pub struct SessionService {
    broker: Arc<TokenBroker>,
    api: Arc<dyn SpotifyApi>,
    store: Arc<dyn SecureStore>,
}

impl SessionService {
    pub fn new(
        broker: Arc<TokenBroker>,
        api: Arc<dyn SpotifyApi>,
        store: Arc<dyn SecureStore>,
    ) -> Self {
        Self { broker, api, store }
    }

    pub fn broker(&self) -> &Arc<TokenBroker> {
        &self.broker
    }

    /// Interactive login followed by profile validation.
    pub async fn login(&self, prompt: &dyn AuthorizationPrompt) -> Result<SpotifyProfile> {
        self.broker.login(prompt).await?;
        self.validate().await
    }

    /// Completes a login from a redirect obtained elsewhere, then validates.
    pub async fn complete_login(&self, redirect: &str) -> Result<SpotifyProfile> {
        self.broker.complete_authorization(redirect).await?;
        self.validate().await
    }

    /// Checks the stored user token against the provider.
    ///
    /// A 401 means the token is dead: it is removed so the next action asks
    /// for a fresh login.
    pub async fn validate(&self) -> Result<SpotifyProfile> {
        let token = self.broker.require_user_token().await?;

        match self.api.current_profile(&token).await {
            Ok(profile) => {
                if let Err(e) = self.store.set_item(SPOTIFY_USER_ID_KEY, &profile.id).await {
                    tracing::warn!("Could not store Spotify user id: {}", e);
                }
                tracing::info!("Spotify user ID stored as {}: {}", SPOTIFY_USER_ID_KEY, profile.id);
                Ok(profile)
            }
            Err(NonstopError::Unauthorized) => {
                tracing::warn!("Spotify rejected the stored token; a new login is required");
                if let Err(e) = self.broker.invalidate_user_token().await {
                    tracing::error!("Failed to remove rejected token: {}", e);
                }
                self.broker.emit(BrokerEvent::ReauthorizationRequired);
                self.broker.notify(UserNotice::MissingToken);
                Err(NonstopError::Unauthorized)
            }
            Err(e) => {
                tracing::error!("Error fetching Spotify profile: {}", e);
                self.broker.notify(e.notice());
                Err(e)
            }
        }
    }

    /// Like [`SessionService::validate`], but degrades to `None`.
    pub async fn profile(&self) -> Option<SpotifyProfile> {
        self.validate().await.ok()
    }

    /// Spotify user id recorded by the last successful validation.
    pub async fn stored_user_id(&self) -> Result<Option<String>> {
        self.store.get_item(SPOTIFY_USER_ID_KEY).await
    }

    pub async fn status(&self) -> Result<SessionStatus> {
        let status = match self.broker.stored_user_token().await? {
            None => SessionStatus::LoggedOut,
            Some(token) => match token.expires_at {
                Some(expired_at) if token.is_expired() => SessionStatus::Expired { expired_at },
                expires_at => SessionStatus::Active { expires_at },
            },
        };
        Ok(status)
    }

    pub async fn logout(&self) -> Result<()> {
        self.broker.invalidate_user_token().await?;
        self.store.delete_item(SPOTIFY_USER_ID_KEY).await?;
        Ok(())
    }
}
