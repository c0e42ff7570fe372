//! Composition root: every service is built here once and passed down.

use anyhow::{Context, Result};
use nonstop_application::{BrokerEvent, CatalogService, SessionService, TokenBroker};
use nonstop_core::secure_store::SecureStore;
use nonstop_infrastructure::{ConfigService, FileSecureStore, MemorySecureStore, SecretServiceImpl};
use nonstop_interaction::{SpotifyAccountsClient, SpotifyWebClient};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub struct App {
    pub broker: Arc<TokenBroker>,
    pub session: SessionService,
    pub catalog: CatalogService,
    events: UnboundedReceiver<BrokerEvent>,
}

impl App {
    pub fn bootstrap(config_dir: Option<&Path>, ephemeral: bool) -> Result<Self> {
        let config = ConfigService::new(config_dir)
            .context("Failed to resolve config path")?
            .get_config()
            .context("Failed to load config.toml")?;
        let spotify = config.spotify;

        let secrets = Arc::new(
            SecretServiceImpl::new(config_dir).context("Failed to resolve secret path")?,
        );

        let store: Arc<dyn SecureStore> = if ephemeral {
            Arc::new(MemorySecureStore::new())
        } else {
            Arc::new(FileSecureStore::new(config_dir).context("Failed to resolve secure store path")?)
        };

        let http = reqwest::Client::new();
        let accounts = Arc::new(SpotifyAccountsClient::from_config(http.clone(), &spotify));
        let api = Arc::new(SpotifyWebClient::from_config(http, &spotify));

        let (tx, events) = mpsc::unbounded_channel();
        let broker = Arc::new(TokenBroker::new(spotify, secrets, accounts, store.clone()).with_events(tx));

        tracing::debug!("Services initialized (ephemeral store: {})", ephemeral);

        Ok(Self {
            session: SessionService::new(broker.clone(), api.clone(), store),
            catalog: CatalogService::new(broker.clone(), api),
            broker,
            events,
        })
    }

    /// Prints any notices published since the last call.
    pub fn flush_notices(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let BrokerEvent::Notice(notice) = event {
                eprintln!("{}", notice);
            }
        }
    }
}
