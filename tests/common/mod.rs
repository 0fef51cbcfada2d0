#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Duration, Utc};
use diskplayer::types::Token;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const GOOD_CODE: &str = "good-code";
/// Code whose exchange answers with an `expires_in` no clock can represent.
pub const OVERFLOW_CODE: &str = "overflow-code";
/// Refresh token the fake accounts service refuses.
pub const REVOKED_REFRESH: &str = "revoked";

pub fn token(access: &str, expires_in_secs: i64) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh-0".to_string(),
        expiry: Utc::now() + Duration::seconds(expires_in_secs),
        token_type: "Bearer".to_string(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Fake accounts service: accepts `GOOD_CODE` and any refresh token except
/// `REVOKED_REFRESH`.
pub async fn accounts_server() -> String {
    async fn token_endpoint(
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !headers.contains_key("authorization") {
            let body = json!({"error": "invalid_client"});
            return (StatusCode::UNAUTHORIZED, Json(body));
        }

        let field = |key: &str| form.get(key).map(String::as_str);
        match (field("grant_type"), field("code"), field("refresh_token")) {
            (Some("authorization_code"), Some(GOOD_CODE), _) => (
                StatusCode::OK,
                Json(json!({
                    "access_token": "access-1",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "refresh_token": "refresh-1",
                    "scope": "user-read-playback-state"
                })),
            ),
            (Some("authorization_code"), Some(OVERFLOW_CODE), _) => (
                StatusCode::OK,
                Json(json!({
                    "access_token": "access-1",
                    "token_type": "Bearer",
                    "expires_in": i64::MAX,
                    "refresh_token": "refresh-1"
                })),
            ),
            (Some("refresh_token"), _, Some(refresh)) if refresh != REVOKED_REFRESH => (
                StatusCode::OK,
                Json(json!({
                    "access_token": "access-2",
                    "token_type": "Bearer",
                    "expires_in": 3600
                })),
            ),
            _ => {
                let body = json!({"error": "invalid_grant"});
                (StatusCode::BAD_REQUEST, Json(body))
            }
        }
    }

    let addr = serve(Router::new().route("/api/token", post(token_endpoint))).await;
    format!("http://{addr}")
}

/// A request seen by the fake Web API: method + path, bearer token, query, body.
#[derive(Debug, Clone)]
pub struct Seen {
    pub endpoint: String,
    pub bearer: String,
    pub query: HashMap<String, String>,
    pub body: Value,
}

pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

fn record(
    log: &SeenLog,
    endpoint: &str,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Value,
) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim_start_matches("Bearer ")
        .to_string();
    log.lock().unwrap().push(Seen {
        endpoint: endpoint.to_string(),
        bearer,
        query,
        body,
    });
}

/// Fake Web API with two devices; pause answers 404 as when nothing plays.
pub async fn api_server() -> (String, SeenLog) {
    api_server_with_pause(StatusCode::NOT_FOUND, Value::Null).await
}

/// Spotify's error envelope, as sent with failed player commands.
pub fn player_error(status: u16, reason: &str) -> Value {
    json!({"error": {"status": status, "message": "Player command failed", "reason": reason}})
}

#[derive(Clone)]
struct FakeApi {
    log: SeenLog,
    pause: (StatusCode, Value),
}

/// Fake Web API whose pause endpoint answers with `status` and `body`.
pub async fn api_server_with_pause(status: StatusCode, body: Value) -> (String, SeenLog) {
    let log: SeenLog = Arc::new(Mutex::new(Vec::new()));
    let api = FakeApi {
        log: log.clone(),
        pause: (status, body),
    };

    async fn devices(State(api): State<FakeApi>, headers: HeaderMap) -> Json<Value> {
        record(&api.log, "GET /me/player/devices", &headers, HashMap::new(), Value::Null);
        Json(json!({
            "devices": [
                {
                    "id": "phone-id", "name": "Phone", "is_active": true,
                    "type": "Smartphone", "volume_percent": 60
                },
                {
                    "id": "kitchen-id", "name": "Kitchen", "is_active": false,
                    "type": "Speaker", "volume_percent": null
                },
                {"id": null, "name": "Restricted", "is_active": false, "type": "TV"}
            ]
        }))
    }

    async fn pause(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
        record(&api.log, "PUT /me/player/pause", &headers, HashMap::new(), Value::Null);
        let (status, body) = api.pause;
        if body.is_null() {
            status.into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }

    async fn transfer(
        State(api): State<FakeApi>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        record(&api.log, "PUT /me/player", &headers, HashMap::new(), body);
        StatusCode::NO_CONTENT
    }

    async fn play(
        State(api): State<FakeApi>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        record(&api.log, "PUT /me/player/play", &headers, query, body);
        StatusCode::NO_CONTENT
    }

    let app = Router::new()
        .route("/me/player/devices", get(devices))
        .route("/me/player/pause", put(pause))
        .route("/me/player", put(transfer))
        .route("/me/player/play", put(play))
        .with_state(api);

    let addr = serve(app).await;
    (format!("http://{addr}"), log)
}
