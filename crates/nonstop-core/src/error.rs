//! Error types for the Nonstop application.

use crate::notice::UserNotice;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Nonstop application.
///
/// Every failure is terminal for the current user action: nothing in the
/// application retries on its own. Use [`NonstopError::notice`] to turn an
/// error into the alert shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NonstopError {
    /// No user token has been stored yet (or it was invalidated).
    #[error("Spotify access token is missing")]
    MissingToken,

    /// The stored user token is past its expiry instant.
    #[error("Spotify access token has expired")]
    TokenExpired,

    /// The provider rejected the bearer token (HTTP 401).
    #[error("Spotify rejected the access token")]
    Unauthorized,

    /// No app-scoped token could be obtained.
    #[error("No access token available")]
    AppTokenUnavailable,

    /// Caller-supplied value rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The authorization redirect carried an error, or was unusable.
    ///
    /// The message is the provider's text, unchanged.
    #[error("{0}")]
    AuthorizationError(String),

    /// Non-2xx response from a remote endpoint.
    #[error("HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// Secure storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error (missing client id, bad config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl NonstopError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an AuthorizationError
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::AuthorizationError(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Returns true when the only way forward is a fresh interactive login.
    pub fn is_reauthorization_required(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::TokenExpired | Self::Unauthorized
        )
    }

    /// Maps this error to the alert presented to the user.
    pub fn notice(&self) -> UserNotice {
        match self {
            Self::MissingToken | Self::TokenExpired | Self::Unauthorized => {
                UserNotice::MissingToken
            }
            Self::AuthorizationError(message) => UserNotice::AuthenticationError(message.clone()),
            Self::Storage(_) => UserNotice::StorageError,
            _ => UserNotice::TryAgain,
        }
    }
}

impl From<std::io::Error> for NonstopError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for NonstopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NonstopError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for NonstopError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, NonstopError>`.
pub type Result<T> = std::result::Result<T, NonstopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reauthorization_required() {
        assert!(NonstopError::MissingToken.is_reauthorization_required());
        assert!(NonstopError::TokenExpired.is_reauthorization_required());
        assert!(NonstopError::Unauthorized.is_reauthorization_required());
        assert!(!NonstopError::http(500, "boom").is_reauthorization_required());
    }

    #[test]
    fn test_authorization_error_is_verbatim() {
        let err = NonstopError::authorization("access_denied");
        assert_eq!(err.to_string(), "access_denied");
        assert_eq!(
            err.notice(),
            UserNotice::AuthenticationError("access_denied".to_string())
        );
    }

    #[test]
    fn test_network_errors_map_to_try_again() {
        assert_eq!(
            NonstopError::Network("timed out".into()).notice(),
            UserNotice::TryAgain
        );
        assert_eq!(NonstopError::http(503, "").notice(), UserNotice::TryAgain);
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: NonstopError = io.into();
        assert!(err.to_string().contains("PermissionDenied"));
    }
}
