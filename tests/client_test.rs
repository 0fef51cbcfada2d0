mod common;

use axum::http::StatusCode;
use diskplayer::{
    Error,
    management::TokenStore,
    spotify::{Authenticator, PlayerApi, SpotifyClient},
    types::Token,
};
use serde_json::{Value, json};

async fn client(
    dir: &tempfile::TempDir,
    access: &str,
    expires_in: i64,
) -> (SpotifyClient, common::SeenLog, TokenStore) {
    let (api, log) = common::api_server().await;
    let parts = client_for(dir, common::token(access, expires_in), api).await;
    (parts.client, log, parts.store)
}

/// Client with `token` against the fake accounts service and the Web API at `api`.
async fn client_for(dir: &tempfile::TempDir, token: Token, api: String) -> Parts {
    let accounts = common::accounts_server().await;
    let authenticator =
        Authenticator::new("client-id", "client-secret", "http://localhost:8888/callback")
            .unwrap()
            .with_accounts_url(&accounts)
            .unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let client = SpotifyClient::new(token, authenticator, store.clone()).with_api_url(api);
    Parts { client, store }
}

struct Parts {
    client: SpotifyClient,
    store: TokenStore,
}

async fn pausing(dir: &tempfile::TempDir, status: StatusCode, body: Value) -> Parts {
    let (api, _) = common::api_server_with_pause(status, body).await;
    client_for(dir, common::token("access-1", 3600), api).await
}

#[tokio::test]
async fn test_devices_are_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, _) = client(&dir, "access-1", 3600).await;

    let devices = client.devices().await.unwrap();

    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0].id.as_deref(), Some("phone-id"));
    assert!(devices[0].is_active);
    assert_eq!(devices[1].name, "Kitchen");
    assert_eq!(devices[1].device_type, "Speaker");
    assert_eq!(devices[2].id, None);

    let seen = log.lock().unwrap();
    assert_eq!(seen[0].bearer, "access-1");
}

#[tokio::test]
async fn test_pause_with_nothing_playing_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, _) = client(&dir, "access-1", 3600).await;

    let paused = client.pause().await.unwrap();

    assert!(!paused);
    assert_eq!(log.lock().unwrap()[0].endpoint, "PUT /me/player/pause");
}

#[tokio::test]
async fn test_pause_while_playing_reports_paused() {
    let dir = tempfile::tempdir().unwrap();
    let parts = pausing(&dir, StatusCode::NO_CONTENT, Value::Null).await;

    assert!(parts.client.pause().await.unwrap());
}

#[tokio::test]
async fn test_pause_when_already_paused_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let body = json!({"error": {
        "status": 403,
        "message": "Player command failed: Restriction violated",
        "reason": "UNKNOWN"
    }});
    let parts = pausing(&dir, StatusCode::FORBIDDEN, body).await;

    assert!(!parts.client.pause().await.unwrap());
}

#[tokio::test]
async fn test_pause_refused_for_other_reason_is_player_error() {
    let dir = tempfile::tempdir().unwrap();
    let body = common::player_error(403, "PREMIUM_REQUIRED");
    let parts = pausing(&dir, StatusCode::FORBIDDEN, body).await;

    match parts.client.pause().await {
        Err(Error::Player { reason, .. }) => assert_eq!(reason, "PREMIUM_REQUIRED"),
        other => panic!("expected Player error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pause_server_error_is_api_error() {
    let dir = tempfile::tempdir().unwrap();
    let body = common::player_error(500, "UNKNOWN");
    let parts = pausing(&dir, StatusCode::INTERNAL_SERVER_ERROR, body).await;

    assert!(matches!(parts.client.pause().await, Err(Error::Api(_))));
}

#[tokio::test]
async fn test_transfer_does_not_start_playback() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, _) = client(&dir, "access-1", 3600).await;

    client.transfer_playback("kitchen-id", false).await.unwrap();

    let seen = log.lock().unwrap();
    assert_eq!(seen[0].endpoint, "PUT /me/player");
    assert_eq!(seen[0].body, json!({"device_ids": ["kitchen-id"], "play": false}));
}

#[tokio::test]
async fn test_play_album_sends_context_uri() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, _) = client(&dir, "access-1", 3600).await;

    client.play("kitchen-id", "spotify:album:123").await.unwrap();

    let seen = log.lock().unwrap();
    assert_eq!(seen[0].query["device_id"], "kitchen-id");
    assert_eq!(seen[0].body, json!({"context_uri": "spotify:album:123"}));
}

#[tokio::test]
async fn test_play_track_sends_uris() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, _) = client(&dir, "access-1", 3600).await;

    client.play("kitchen-id", "spotify:track:abc").await.unwrap();

    assert_eq!(
        log.lock().unwrap()[0].body,
        json!({"uris": ["spotify:track:abc"]})
    );
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let (client, log, store) = client(&dir, "stale", -60).await;

    client.devices().await.unwrap();

    assert_eq!(log.lock().unwrap()[0].bearer, "access-2");
    let saved = store.load().await.unwrap();
    assert_eq!(saved.access_token, "access-2");
    assert_eq!(saved.refresh_token, "refresh-0");
    assert_eq!(client.token().await, saved);
}

#[tokio::test]
async fn test_fresh_token_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let (client, _, store) = client(&dir, "access-1", 3600).await;

    client.devices().await.unwrap();

    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_rejected_refresh_is_auth_error_and_leaves_token_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let (api, log) = common::api_server().await;
    let mut stale = common::token("stale", -60);
    stale.refresh_token = common::REVOKED_REFRESH.to_string();
    let parts = client_for(&dir, stale.clone(), api).await;
    parts.store.save(&stale).await.unwrap();

    let result = parts.client.devices().await;

    assert!(matches!(result, Err(Error::Auth(_))));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(parts.store.load().await.unwrap(), stale);
    assert_eq!(parts.client.token().await, stale);
}
