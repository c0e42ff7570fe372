//! Authorization request builder for the interactive (implicit grant) login.

use nonstop_core::config::SpotifyConfig;
use nonstop_core::{NonstopError, Result};
use reqwest::Url;

/// `GET /authorize` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub show_dialog: bool,
    pub state: Option<String>,
}

impl AuthorizeRequest {
    pub fn from_config(client_id: impl Into<String>, config: &SpotifyConfig) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            show_dialog: config.show_dialog,
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Space-delimited scope list.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Builds the full authorization URL under `accounts_url`.
    pub fn to_url(&self, accounts_url: &str) -> Result<Url> {
        let endpoint = format!("{}/authorize", accounts_url.trim_end_matches('/'));
        let scope = self.scope();

        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.client_id.as_str()),
            ("response_type", "token"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
        ];
        if self.show_dialog {
            params.push(("show_dialog", "true"));
        }
        if let Some(state) = &self.state {
            params.push(("state", state.as_str()));
        }

        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| NonstopError::config(format!("Invalid accounts URL {}: {}", endpoint, e)))
    }
}
