//! Response helpers shared by the Spotify clients.

use nonstop_core::{NonstopError, Result};
use serde::de::DeserializeOwned;

/// Maps a transport failure (no response at all).
pub(crate) fn network_error(context: &str, err: reqwest::Error) -> NonstopError {
    NonstopError::Network(format!("{}: {}", context, err))
}

/// Returns the response unchanged on 2xx, or an error carrying status and body.
///
/// 401 becomes [`NonstopError::Unauthorized`] so callers can trigger a new login.
pub(crate) async fn ensure_success(
    context: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    tracing::error!("{} failed ({}): {}", context, status, body);

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(NonstopError::Unauthorized);
    }
    Err(NonstopError::http(status.as_u16(), body))
}

/// Parses a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    context: &str,
    response: reqwest::Response,
) -> Result<T> {
    let response = ensure_success(context, response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| network_error(context, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
