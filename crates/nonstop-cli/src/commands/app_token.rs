use crate::app::App;
use anyhow::{Result, bail};

pub async fn fetch(app: &App, show: bool) -> Result<()> {
    let Some(token) = app.broker.fetch_app_token().await else {
        bail!("Could not obtain an app token (see log for details)");
    };

    match token.expires_at {
        Some(at) => println!("{} token acquired, expires {}", token.kind, at.to_rfc3339()),
        None => println!("{} token acquired", token.kind),
    }
    if show {
        println!("{}", token.access_token);
    }
    Ok(())
}
