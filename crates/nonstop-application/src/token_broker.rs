//! Token broker.
//!
//! Obtains bearer tokens for the Spotify Web API through either flow and
//! hands them to callers that do not care which flow produced them:
//!
//! - **User tokens** come from the interactive implicit-grant login. They
//!   are persisted under [`USER_TOKEN_KEY`] and reused across launches.
//! - **App tokens** come from the client-credentials exchange. They live in
//!   memory only and are reacquired per process.
//!
//! Every token carries its expiry; an expired user token is never handed
//! out, the caller gets [`NonstopError::TokenExpired`] and a
//! [`BrokerEvent::ReauthorizationRequired`] is published instead.

use crate::event::{BrokerEvent, EventSender};
use chrono::{DateTime, Utc};
use nonstop_core::config::SpotifyConfig;
use nonstop_core::secret::SecretService;
use nonstop_core::secure_store::SecureStore;
use nonstop_core::spotify::{AccountsApi, AuthorizationPrompt, AuthorizationResponse};
use nonstop_core::token::{USER_TOKEN_EXPIRY_KEY, USER_TOKEN_KEY};
use nonstop_core::{NonstopError, Result, SessionToken, TokenKind, UserNotice};
use nonstop_interaction::{AuthorizeRequest, parse_redirect};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

pub const STATE_MISMATCH_MESSAGE: &str = "state mismatch";

/// Latest app token together with the attempt that produced it.
#[derive(Default)]
struct AppTokenSlot {
    attempt: u64,
    token: Option<SessionToken>,
}

pub struct TokenBroker {
    config: SpotifyConfig,
    secrets: Arc<dyn SecretService>,
    accounts: Arc<dyn AccountsApi>,
    store: Arc<dyn SecureStore>,
    events: Option<EventSender>,
    user_token: RwLock<Option<SessionToken>>,
    app_token: RwLock<AppTokenSlot>,
    app_attempts: AtomicU64,
    pending_state: Mutex<Option<String>>,
}

impl TokenBroker {
    pub fn new(
        config: SpotifyConfig,
        secrets: Arc<dyn SecretService>,
        accounts: Arc<dyn AccountsApi>,
        store: Arc<dyn SecureStore>,
    ) -> Self {
        Self {
            config,
            secrets,
            accounts,
            store,
            events: None,
            user_token: RwLock::new(None),
            app_token: RwLock::new(AppTokenSlot::default()),
            app_attempts: AtomicU64::new(0),
            pending_state: Mutex::new(None),
        }
    }

    /// Publishes broker events to `events`.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    pub(crate) fn emit(&self, event: BrokerEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver just means nobody is listening anymore.
            let _ = events.send(event);
        }
    }

    pub(crate) fn notify(&self, notice: UserNotice) {
        self.emit(BrokerEvent::Notice(notice));
    }

    // ========================================================================
    // Interactive user flow
    // ========================================================================

    /// Builds the authorization URL and remembers its `state` as the pending login.
    ///
    /// A new call supersedes any earlier pending login.
    pub async fn authorize_url(&self) -> Result<String> {
        let credentials = self.secrets.spotify_credentials().await?;
        let state = uuid::Uuid::new_v4().to_string();

        let url = AuthorizeRequest::from_config(credentials.client_id, &self.config)
            .with_state(state.clone())
            .to_url(&self.config.accounts_url)?;

        *self.pending_state.lock().await = Some(state);
        Ok(url.to_string())
    }

    /// Consumes the redirect the provider sent the user back to.
    ///
    /// On success the exact token string is written to the secure store and
    /// `TokenAcquired` is published once. Provider errors are returned (and
    /// published) with the provider's message unchanged, and nothing is
    /// written.
    pub async fn complete_authorization(&self, redirect: &str) -> Result<SessionToken> {
        let expected_state = self.pending_state.lock().await.take();

        let response = match parse_redirect(redirect) {
            Ok(response) => response,
            Err(e) => return Err(self.authorization_failed(e)),
        };

        match response {
            AuthorizationResponse::Error {
                error, description, ..
            } => {
                let message = description.filter(|d| !d.is_empty()).unwrap_or(error);
                Err(self.authorization_failed(NonstopError::authorization(message)))
            }
            AuthorizationResponse::Token {
                access_token,
                expires_in,
                scope,
                state,
                ..
            } => {
                if let Some(expected) = expected_state {
                    if state.as_deref() != Some(expected.as_str()) {
                        tracing::warn!("Authorization redirect state does not match the pending login");
                        return Err(self.authorization_failed(NonstopError::authorization(
                            STATE_MISMATCH_MESSAGE,
                        )));
                    }
                }

                let scopes = match scope {
                    Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
                    None => self.config.scopes.clone(),
                };
                let token = SessionToken::new(access_token, TokenKind::User)
                    .expiring_in(Utc::now(), expires_in)
                    .with_scopes(scopes);

                if let Err(e) = self.persist_user_token(&token).await {
                    tracing::error!("Error storing the access token: {}", e);
                    self.notify(UserNotice::StorageError);
                    return Err(e);
                }

                *self.user_token.write().await = Some(token.clone());
                tracing::info!(
                    "Spotify login succeeded (expires_at: {:?})",
                    token.expires_at
                );
                self.emit(BrokerEvent::TokenAcquired(token.clone()));
                self.notify(UserNotice::LoginSucceeded);
                Ok(token)
            }
        }
    }

    /// Runs the whole interactive flow through `prompt`. No retry.
    pub async fn login(&self, prompt: &dyn AuthorizationPrompt) -> Result<SessionToken> {
        let url = self.authorize_url().await?;
        let redirect = match prompt.authorize(&url).await {
            Ok(redirect) => redirect,
            Err(e) => {
                tracing::error!("Login error: {}", e);
                self.notify(e.notice());
                return Err(e);
            }
        };
        self.complete_authorization(&redirect).await
    }

    fn authorization_failed(&self, err: NonstopError) -> NonstopError {
        let message = err.to_string();
        tracing::warn!("Authentication error: {}", message);
        self.emit(BrokerEvent::AuthorizationFailed(message));
        self.notify(err.notice());
        err
    }

    async fn persist_user_token(&self, token: &SessionToken) -> Result<()> {
        self.store
            .set_item(USER_TOKEN_KEY, &token.access_token)
            .await?;
        match token.expires_at {
            Some(expires_at) => {
                self.store
                    .set_item(USER_TOKEN_EXPIRY_KEY, &expires_at.to_rfc3339())
                    .await
            }
            None => self.store.delete_item(USER_TOKEN_EXPIRY_KEY).await,
        }
    }

    // ========================================================================
    // Stored user token
    // ========================================================================

    /// Returns the user token from memory, or from the secure store.
    ///
    /// Expiry is not checked here; see [`TokenBroker::require_user_token`].
    pub async fn stored_user_token(&self) -> Result<Option<SessionToken>> {
        if let Some(token) = self.user_token.read().await.as_ref() {
            return Ok(Some(token.clone()));
        }

        let Some(access_token) = self.store.get_item(USER_TOKEN_KEY).await? else {
            return Ok(None);
        };

        let expires_at = match self.store.get_item(USER_TOKEN_EXPIRY_KEY).await? {
            Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable token expiry '{}': {}", raw, e);
                    None
                }
            },
            None => None,
        };

        let mut token = SessionToken::new(access_token, TokenKind::User);
        token.expires_at = expires_at;

        *self.user_token.write().await = Some(token.clone());
        Ok(Some(token))
    }

    /// Returns a usable user token or the reason there is none.
    ///
    /// Missing and expired tokens both ask the user to log in again.
    pub async fn require_user_token(&self) -> Result<SessionToken> {
        let stored = match self.stored_user_token().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!("Failed to read the stored access token: {}", e);
                self.notify(e.notice());
                return Err(e);
            }
        };

        match stored {
            None => {
                self.emit(BrokerEvent::ReauthorizationRequired);
                self.notify(UserNotice::MissingToken);
                Err(NonstopError::MissingToken)
            }
            Some(token) if token.is_expired() => {
                tracing::info!("Stored Spotify token expired at {:?}", token.expires_at);
                self.emit(BrokerEvent::ReauthorizationRequired);
                self.notify(UserNotice::MissingToken);
                Err(NonstopError::TokenExpired)
            }
            Some(token) => Ok(token),
        }
    }

    /// Forgets the user token everywhere (logout, or the provider rejected it).
    pub async fn invalidate_user_token(&self) -> Result<()> {
        *self.user_token.write().await = None;
        self.store.delete_item(USER_TOKEN_KEY).await?;
        self.store.delete_item(USER_TOKEN_EXPIRY_KEY).await?;
        tracing::info!("Stored Spotify token removed");
        Ok(())
    }

    // ========================================================================
    // Client-credentials flow
    // ========================================================================

    /// Exchanges the client credentials for an app token.
    ///
    /// Failures are logged and yield `None`. When several exchanges overlap,
    /// a result never replaces one from a later attempt; the slower caller
    /// gets the installed token instead of its own.
    pub async fn fetch_app_token(&self) -> Option<SessionToken> {
        let attempt = self.app_attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let grant = match self.secrets.spotify_credentials().await {
            Ok(credentials) => self.accounts.client_credentials(&credentials).await,
            Err(e) => Err(e),
        };

        let grant = match grant {
            Ok(grant) => grant,
            Err(e) => {
                tracing::error!("Failed to fetch token: {}", e);
                self.emit(BrokerEvent::AppTokenUnavailable(e.to_string()));
                return None;
            }
        };

        let token = SessionToken::new(grant.access_token, TokenKind::App)
            .expiring_in(Utc::now(), grant.expires_in);

        let mut slot = self.app_token.write().await;
        if attempt < slot.attempt {
            tracing::debug!(
                "Discarding app token from attempt {} (attempt {} already installed)",
                attempt,
                slot.attempt
            );
            return slot.token.clone().or(Some(token));
        }
        slot.attempt = attempt;
        slot.token = Some(token.clone());
        drop(slot);

        tracing::info!("App token acquired (expires_at: {:?})", token.expires_at);
        self.emit(BrokerEvent::TokenAcquired(token.clone()));
        Some(token)
    }

    /// The installed app token, if any and not expired.
    pub async fn current_app_token(&self) -> Option<SessionToken> {
        self.app_token
            .read()
            .await
            .token
            .as_ref()
            .filter(|token| !token.is_expired())
            .cloned()
    }

    /// The installed app token, or a freshly fetched one.
    pub async fn app_token(&self) -> Option<SessionToken> {
        match self.current_app_token().await {
            Some(token) => Some(token),
            None => self.fetch_app_token().await,
        }
    }

    /// Drops the installed app token (the provider rejected it).
    pub async fn clear_app_token(&self) {
        self.app_token.write().await.token = None;
    }
}
