//! Recording fakes for the remote seams.

use nonstop_core::config::SpotifyCredentials;
use nonstop_core::secret::SecretService;
use nonstop_core::spotify::{
    AccountsApi, Album, AuthorizationPrompt, SpotifyApi, SpotifyProfile, TokenGrant, Track,
};
use nonstop_core::{NonstopError, Result, SessionToken};
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct FakeSecrets(pub Option<SpotifyCredentials>);

impl FakeSecrets {
    pub fn full() -> Self {
        Self(Some(SpotifyCredentials::new("client-id", Some("client-secret".into()))))
    }
}

#[async_trait::async_trait]
impl SecretService for FakeSecrets {
    async fn spotify_credentials(&self) -> Result<SpotifyCredentials> {
        self.0
            .clone()
            .ok_or_else(|| NonstopError::config("no credentials"))
    }
}

pub fn grant(token: &str, expires_in: Option<u64>) -> TokenGrant {
    TokenGrant {
        access_token: token.to_string(),
        token_type: Some("Bearer".to_string()),
        expires_in,
        scope: None,
    }
}

/// Answers token requests from a queue; an empty queue answers HTTP 400.
#[derive(Default)]
pub struct FakeAccounts {
    responses: Mutex<VecDeque<Result<TokenGrant>>>,
    calls: Mutex<usize>,
}

impl FakeAccounts {
    pub fn with(responses: Vec<Result<TokenGrant>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl AccountsApi for FakeAccounts {
    async fn client_credentials(&self, _credentials: &SpotifyCredentials) -> Result<TokenGrant> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NonstopError::http(400, r#"{"error":"invalid_client"}"#)))
    }
}

/// One observed Web API call: endpoint and the bearer header sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub endpoint: String,
    pub authorization: String,
}

pub struct FakeSpotify {
    pub profile: Mutex<Result<SpotifyProfile>>,
    pub search: Mutex<Result<Vec<Track>>>,
    pub track: Mutex<Result<Track>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(Ok(profile("user42", Some("Ada")))),
            search: Mutex::new(Ok(vec![track("t1", Some("https://p/t1"))])),
            track: Mutex::new(Ok(track("t1", Some("https://p/t1")))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: String, token: &SessionToken) {
        self.calls.lock().unwrap().push(ApiCall {
            endpoint,
            authorization: token.bearer_header(),
        });
    }
}

#[async_trait::async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_profile(&self, token: &SessionToken) -> Result<SpotifyProfile> {
        self.record("GET /v1/me".to_string(), token);
        self.profile.lock().unwrap().clone()
    }

    async fn search_tracks(
        &self,
        token: &SessionToken,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>> {
        self.record(format!("GET /v1/search q={} limit={}", query, limit), token);
        self.search.lock().unwrap().clone()
    }

    async fn track(&self, token: &SessionToken, track_id: &str) -> Result<Track> {
        self.record(format!("GET /v1/tracks/{}", track_id), token);
        self.track.lock().unwrap().clone()
    }
}

pub fn profile(id: &str, display_name: Option<&str>) -> SpotifyProfile {
    SpotifyProfile {
        id: id.to_string(),
        display_name: display_name.map(str::to_string),
        email: None,
        country: None,
        product: None,
        images: Vec::new(),
    }
}

pub fn track(id: &str, preview_url: Option<&str>) -> Track {
    Track {
        id: id.to_string(),
        name: "Song".to_string(),
        artists: Vec::new(),
        album: Album {
            id: None,
            name: "LP".to_string(),
            images: Vec::new(),
        },
        preview_url: preview_url.map(str::to_string),
        duration_ms: None,
    }
}

/// Answers the prompt with `fragment`, echoing the `state` of the URL it was shown.
pub struct EchoPrompt {
    pub fragment: String,
    pub shown: Mutex<Vec<String>>,
}

impl EchoPrompt {
    pub fn new(fragment: &str) -> Self {
        Self {
            fragment: fragment.to_string(),
            shown: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl AuthorizationPrompt for EchoPrompt {
    async fn authorize(&self, authorize_url: &str) -> Result<String> {
        self.shown.lock().unwrap().push(authorize_url.to_string());
        let state = authorize_url
            .split(['?', '&'])
            .find_map(|pair| pair.strip_prefix("state="))
            .unwrap_or_default();
        Ok(format!(
            "nonstop://spotify-auth#{}&state={}",
            self.fragment, state
        ))
    }
}
