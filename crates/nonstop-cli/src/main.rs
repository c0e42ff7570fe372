use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod commands;
mod logging;
mod prompt;

#[derive(Parser)]
#[command(name = "nonstop")]
#[command(about = "Nonstop CLI - Spotify login and catalog access", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and the secure store
    #[arg(long, global = true, env = "NONSTOP_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Keep tokens in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with Spotify and validate the new token
    Login {
        /// Redirect URL to complete the login with, instead of prompting
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a user token is stored and when it expires
    Status,
    /// Fetch the Spotify profile for the stored token
    Whoami,
    /// Exchange the client credentials for an app token
    AppToken {
        /// Print the token itself
        #[arg(long)]
        show: bool,
    },
    /// Search the catalog for tracks
    Search {
        query: Vec<String>,
    },
    /// Print the preview URL of a track
    Track {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut app = app::App::bootstrap(cli.config_dir.as_deref(), cli.ephemeral)?;

    let result = match cli.command {
        Commands::Login { redirect } => commands::session::login(&app, redirect).await,
        Commands::Logout => commands::session::logout(&app).await,
        Commands::Status => commands::session::status(&app).await,
        Commands::Whoami => commands::session::whoami(&app).await,
        Commands::AppToken { show } => commands::app_token::fetch(&app, show).await,
        Commands::Search { query } => commands::catalog::search(&app, &query.join(" ")).await,
        Commands::Track { id } => commands::catalog::track(&app, &id).await,
    };

    app.flush_notices();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["nonstop", "status", "--ephemeral", "--config-dir", "/tmp/x"])
            .unwrap();
        assert!(cli.ephemeral);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn search_joins_words() {
        let cli = Cli::try_parse_from(["nonstop", "search", "daft", "punk"]).unwrap();
        match cli.command {
            Commands::Search { query } => assert_eq!(query.join(" "), "daft punk"),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn login_accepts_redirect() {
        let cli = Cli::try_parse_from([
            "nonstop",
            "login",
            "--redirect",
            "nonstop://spotify-auth#access_token=abc",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Login { redirect: Some(ref r) } if r.ends_with("access_token=abc")
        ));
    }
}
