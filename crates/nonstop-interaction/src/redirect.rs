//! Authorization redirect parsing.
//!
//! The implicit grant returns its parameters in the URL fragment; errors
//! (and some clients) use the query string. Both are accepted, fragment
//! first. A bare parameter string (`access_token=...`) is accepted too, for
//! redirects pasted by hand.

use nonstop_core::spotify::AuthorizationResponse;
use nonstop_core::{NonstopError, Result};
use reqwest::Url;
use std::collections::HashMap;

/// Message used when a redirect carries neither a token nor an error.
pub const MALFORMED_REDIRECT_MESSAGE: &str = "Something went wrong";

pub fn parse_redirect(redirect: &str) -> Result<AuthorizationResponse> {
    let redirect = redirect.trim();
    let params = match Url::parse(redirect) {
        Ok(url) => url_params(&url),
        Err(_) => decode_pairs(redirect.trim_start_matches(['#', '?'])),
    };
    from_params(params)
}

fn url_params(url: &Url) -> HashMap<String, String> {
    let mut params = url.fragment().map(decode_pairs).unwrap_or_default();
    for (key, value) in url.query_pairs() {
        params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    params
}

fn decode_pairs(encoded: &str) -> HashMap<String, String> {
    // Borrow the url crate's form decoder through a throwaway base.
    match Url::parse("nonstop://redirect/") {
        Ok(mut base) => {
            base.set_query(Some(encoded));
            base.query_pairs().into_owned().collect()
        }
        Err(_) => HashMap::new(),
    }
}

fn from_params(mut params: HashMap<String, String>) -> Result<AuthorizationResponse> {
    let state = params.remove("state").filter(|s| !s.is_empty());

    if let Some(error) = params.remove("error") {
        return Ok(AuthorizationResponse::Error {
            error,
            description: params.remove("error_description"),
            state,
        });
    }

    match params.remove("access_token").filter(|t| !t.is_empty()) {
        Some(access_token) => Ok(AuthorizationResponse::Token {
            access_token,
            token_type: params.remove("token_type"),
            expires_in: params.get("expires_in").and_then(|v| v.parse().ok()),
            scope: params.remove("scope"),
            state,
        }),
        None => Err(NonstopError::authorization(MALFORMED_REDIRECT_MESSAGE)),
    }
}
