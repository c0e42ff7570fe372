//! Terminal authorization prompt.

use async_trait::async_trait;
use nonstop_core::spotify::AuthorizationPrompt;
use nonstop_core::{NonstopError, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints the authorization URL and reads the redirect URL back from stdin.
pub struct TerminalPrompt;

#[async_trait]
impl AuthorizationPrompt for TerminalPrompt {
    async fn authorize(&self, authorize_url: &str) -> Result<String> {
        eprintln!("Open this URL in a browser and approve access:\n\n  {}\n", authorize_url);
        eprintln!("Then paste the full URL you were redirected to:");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;

        let redirect = line.trim();
        if redirect.is_empty() {
            return Err(NonstopError::authorization("No redirect URL was entered"));
        }
        Ok(redirect.to_string())
    }
}
