//! Session token model.
//!
//! A [`SessionToken`] is the bearer credential presented to the Spotify Web
//! API. It always carries its kind and, when the provider reported one, the
//! instant it stops being valid.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Secure-store key holding the last interactive (user) token, plain text.
pub const USER_TOKEN_KEY: &str = "spotify_token";

/// Secure-store key holding the user token expiry as RFC 3339.
pub const USER_TOKEN_EXPIRY_KEY: &str = "spotify_token_expires_at";

/// Secure-store key holding the Spotify user id of the logged-in profile.
pub const SPOTIFY_USER_ID_KEY: &str = "spotifyUserID";

/// Tokens this close to expiry are treated as already expired.
pub const EXPIRY_LEEWAY_SECS: i64 = 30;

/// How a token was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Interactive authorization; carries user scopes.
    User,
    /// Client credentials; catalog access only, no user identity.
    App,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::User => write!(f, "user"),
            TokenKind::App => write!(f, "app"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub kind: TokenKind,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            access_token: access_token.into(),
            kind,
            scopes: Vec::new(),
            expires_at: None,
        }
    }

    /// Sets the expiry to `issued_at + expires_in` seconds.
    ///
    /// A lifetime that does not fit the calendar leaves the expiry unknown.
    pub fn expiring_in(mut self, issued_at: DateTime<Utc>, expires_in: Option<u64>) -> Self {
        self.expires_at = expires_in.and_then(|secs| {
            let secs = i64::try_from(secs).ok()?;
            issued_at.checked_add_signed(Duration::try_seconds(secs)?)
        });
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// A token without a known expiry is never considered expired locally;
    /// the provider will reject it when the time comes.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now
                .checked_add_signed(Duration::seconds(EXPIRY_LEEWAY_SECS))
                .is_none_or(|deadline| deadline >= expires_at),
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("access_token", &"<redacted>")
            .field("kind", &self.kind)
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
