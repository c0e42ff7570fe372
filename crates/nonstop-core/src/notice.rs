//! User-facing alerts.
//!
//! The application never shows raw errors. Every outcome worth telling the
//! user about is one of these notices, each with a fixed title and message.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UserNotice {
    /// Interactive login stored a token.
    LoginSucceeded,
    /// The provider refused the authorization; carries its message verbatim.
    AuthenticationError(String),
    /// No usable user token; the user has to log in again.
    MissingToken,
    /// The token could not be written to secure storage.
    StorageError,
    /// Generic network/HTTP failure.
    TryAgain,
}

impl UserNotice {
    pub fn title(&self) -> &'static str {
        match self {
            UserNotice::LoginSucceeded => "Success",
            UserNotice::AuthenticationError(_) => "Authentication error",
            UserNotice::MissingToken => "Error",
            UserNotice::StorageError => "Storage Error",
            UserNotice::TryAgain => "Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            UserNotice::LoginSucceeded => "Successfully logged in with Spotify!".to_string(),
            UserNotice::AuthenticationError(message) => message.clone(),
            UserNotice::MissingToken => {
                "Spotify access token is missing. Please log in again.".to_string()
            }
            UserNotice::StorageError => "Failed to save token securely".to_string(),
            UserNotice::TryAgain => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl std::fmt::Display for UserNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}
