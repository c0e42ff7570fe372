//! Exercises the reqwest clients against an in-process axum server.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use nonstop_core::config::SpotifyCredentials;
use nonstop_core::spotify::{AccountsApi, SpotifyApi};
use nonstop_core::{NonstopError, SessionToken, TokenKind};
use nonstop_interaction::{SpotifyAccountsClient, SpotifyWebClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
    query: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn record(&self, path: &str, headers: &HeaderMap, body: String, query: HashMap<String, String>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.calls.lock().unwrap().push(Recorded {
            path: path.to_string(),
            authorization: header("authorization"),
            content_type: header("content-type"),
            body,
            query,
        });
    }

    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn credentials() -> SpotifyCredentials {
    SpotifyCredentials::new("id", Some("secret".to_string()))
}

#[tokio::test]
async fn client_credentials_success() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/api/token",
            post(|State(rec): State<Recorder>, headers: HeaderMap, body: String| async move {
                rec.record("/api/token", &headers, body, HashMap::new());
                axum::Json(serde_json::json!({
                    "access_token": "X",
                    "token_type": "Bearer",
                    "expires_in": 3600
                }))
            }),
        )
        .with_state(recorder.clone());
    let base = serve(router).await;

    let grant = SpotifyAccountsClient::new(base)
        .client_credentials(&credentials())
        .await
        .unwrap();
    assert_eq!(grant.access_token, "X");
    assert_eq!(grant.expires_in, Some(3600));

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("Basic aWQ6c2VjcmV0"));
    assert_eq!(
        calls[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(calls[0].body, "grant_type=client_credentials");
}

#[tokio::test]
async fn client_credentials_bad_request() {
    let router = Router::new().route(
        "/api/token",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({"error": "invalid_client"})),
            )
        }),
    );
    let base = serve(router).await;

    let err = SpotifyAccountsClient::new(base)
        .client_credentials(&credentials())
        .await
        .unwrap_err();
    match err {
        NonstopError::Http { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn client_credentials_unreachable_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = SpotifyAccountsClient::new(format!("http://{}", addr))
        .client_credentials(&credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, NonstopError::Network(_)));
}

#[tokio::test]
async fn profile_sends_bearer_header() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/v1/me",
            get(|State(rec): State<Recorder>, headers: HeaderMap| async move {
                rec.record("/v1/me", &headers, String::new(), HashMap::new());
                axum::Json(serde_json::json!({"id": "user42", "display_name": "Ada"}))
            }),
        )
        .with_state(recorder.clone());
    let base = serve(router).await;

    let token = SessionToken::new("abc123", TokenKind::User);
    let profile = SpotifyWebClient::new(base)
        .current_profile(&token)
        .await
        .unwrap();
    assert_eq!(profile.id, "user42");
    assert_eq!(profile.name(), "Ada");

    let calls = recorder.calls();
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn profile_unauthorized() {
    let router = Router::new().route(
        "/v1/me",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({"error": {"status": 401, "message": "The access token expired"}})),
            )
        }),
    );
    let base = serve(router).await;

    let err = SpotifyWebClient::new(base)
        .current_profile(&SessionToken::new("stale", TokenKind::User))
        .await
        .unwrap_err();
    assert_eq!(err, NonstopError::Unauthorized);
}

#[tokio::test]
async fn search_passes_query_and_parses_items() {
    let recorder = Recorder::default();
    let router = Router::new()
        .route(
            "/v1/search",
            get(
                |State(rec): State<Recorder>,
                 headers: HeaderMap,
                 Query(query): Query<HashMap<String, String>>| async move {
                    rec.record("/v1/search", &headers, String::new(), query);
                    axum::Json(serde_json::json!({
                        "tracks": {
                            "items": [{
                                "id": "t1",
                                "name": "Nonstop",
                                "artists": [{"name": "Drake"}],
                                "album": {"name": "Scorpion", "images": [{"url": "https://i/cover"}]},
                                "preview_url": "https://p/t1"
                            }]
                        }
                    }))
                },
            ),
        )
        .with_state(recorder.clone());
    let base = serve(router).await;

    let tracks = SpotifyWebClient::new(base)
        .search_tracks(&SessionToken::new("app", TokenKind::App), "drake & friends", 10)
        .await
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].artist_names(), "Drake");

    let calls = recorder.calls();
    assert_eq!(calls[0].path, "/v1/search");
    assert_eq!(calls[0].query["q"], "drake & friends");
    assert_eq!(calls[0].query["type"], "track");
    assert_eq!(calls[0].query["limit"], "10");
}

#[tokio::test]
async fn search_without_tracks_key_is_empty() {
    let router = Router::new().route("/v1/search", get(|| async { axum::Json(serde_json::json!({})) }));
    let base = serve(router).await;

    let tracks = SpotifyWebClient::new(base)
        .search_tracks(&SessionToken::new("app", TokenKind::App), "x", 10)
        .await
        .unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn track_lookup() {
    let router = Router::new().route(
        "/v1/tracks/{id}",
        get(|Path(id): Path<String>| async move {
            if id != "t1" {
                return StatusCode::NOT_FOUND.into_response();
            }
            axum::Json(serde_json::json!({
                "id": "t1",
                "name": "Song",
                "artists": [],
                "album": {"name": "LP"},
                "preview_url": null
            }))
            .into_response()
        }),
    );
    let base = serve(router).await;
    let client = SpotifyWebClient::new(base);
    let token = SessionToken::new("app", TokenKind::App);

    let track = client.track(&token, "t1").await.unwrap();
    assert!(track.preview_url.is_none());

    let err = client.track(&token, "missing").await.unwrap_err();
    assert!(matches!(err, NonstopError::Http { status: 404, .. }));
}
