use crate::app::App;
use crate::prompt::TerminalPrompt;
use anyhow::Result;
use nonstop_application::SessionStatus;

pub async fn login(app: &App, redirect: Option<String>) -> Result<()> {
    let profile = match redirect {
        Some(redirect) => app.session.complete_login(&redirect).await?,
        None => app.session.login(&TerminalPrompt).await?,
    };
    println!("Logged in as {} ({})", profile.name(), profile.id);
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.logout().await?;
    println!("Logged out");
    Ok(())
}

pub async fn status(app: &App) -> Result<()> {
    match app.session.status().await? {
        SessionStatus::LoggedOut => println!("Not logged in"),
        SessionStatus::Active { expires_at: Some(at) } => {
            println!("Logged in (token expires {})", at.to_rfc3339())
        }
        SessionStatus::Active { expires_at: None } => {
            println!("Logged in (token expiry unknown)")
        }
        SessionStatus::Expired { expired_at } => {
            println!("Session expired at {}; run `nonstop login`", expired_at.to_rfc3339())
        }
    }
    if let Some(user_id) = app.session.stored_user_id().await? {
        println!("Spotify user: {}", user_id);
    }
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let profile = app.session.validate().await?;
    println!("{}", profile.name());
    println!("  id:      {}", profile.id);
    if let Some(email) = &profile.email {
        println!("  email:   {}", email);
    }
    if let Some(product) = &profile.product {
        println!("  product: {}", product);
    }
    Ok(())
}
