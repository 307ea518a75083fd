#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use estate_core::clock::ManualClock;
use estate_core::signing::Credentials;
use estate_core::types::{Row, Timestamp};
use estate_db::{Ledger, MemoryLedger, Sheet};
use estate_storage::MemoryObjectStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use estate_api::auth::password::hash_password;
use estate_api::config::{ServerConfig, StorageConfig, TokenConfig};
use estate_api::router::build_app_router;
use estate_api::state::AppState;

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "open-house";
pub const ADMIN_EMAIL: &str = "ann@agency.test";
pub const AGENT_EMAIL: &str = "ben@agency.test";
pub const OTHER_AGENT_EMAIL: &str = "cho@agency.test";
pub const INACTIVE_EMAIL: &str = "old@agency.test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8081".to_string()],
        request_timeout_secs: 30,
        lease_wait_secs: 10,
        database_url: None,
        token: TokenConfig {
            secret: SECRET.to_string(),
            ttl_ms: estate_core::token::DEFAULT_TOKEN_TTL_MS,
        },
        storage: StorageConfig {
            bucket: "listings".to_string(),
            region: "us-east-1".to_string(),
            credentials: Credentials {
                access_key: "AKIDTEST".to_string(),
                secret_key: "test-secret-key".to_string(),
            },
            endpoint: None,
        },
    }
}

pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Argon2 is slow in debug builds; hash the shared password once.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hashing should succeed"))
}

fn row(value: Value) -> Row {
    value.as_object().cloned().expect("fixture rows are objects")
}

pub struct TestApp {
    pub router: Router,
    pub ledger: Arc<MemoryLedger>,
    pub store: Arc<MemoryObjectStore>,
    pub clock: Arc<ManualClock>,
}

/// Full router over an in-memory ledger and object store, with a manual
/// clock starting at [`t0`].
pub async fn build_test_app() -> TestApp {
    let ledger = Arc::new(MemoryLedger::new());
    seed(ledger.as_ref()).await;

    let store = Arc::new(MemoryObjectStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let config = test_config();

    let state = AppState::new(config.clone(), ledger.clone(), store.clone(), clock.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        ledger,
        store,
        clock,
    }
}

async fn seed(ledger: &MemoryLedger) {
    let hash = password_hash();
    let users = [
        json!({ "id": "u1", "name": "Ann", "email": ADMIN_EMAIL, "role": "admin", "active": true, "password_hash": hash }),
        json!({ "id": "u2", "name": "Ben", "email": AGENT_EMAIL, "role": "agent", "active": "TRUE", "password_hash": hash }),
        json!({ "id": "u3", "name": "Cho", "email": OTHER_AGENT_EMAIL, "role": "agent", "active": true, "password_hash": hash }),
        json!({ "id": "u4", "name": "Old", "email": INACTIVE_EMAIL, "role": "agent", "active": false, "password_hash": hash }),
    ];
    let leads = [
        json!({ "id": "L1", "name": "First buyer", "email": "a@b.c", "phone": "1", "status": "New", "locked_by": "", "locked_at": "" }),
        json!({ "id": "L2", "name": "Second buyer", "email": "d@e.f", "phone": "2", "status": "New", "locked_by": "", "locked_at": "" }),
    ];
    let properties = [json!({
        "id": "P1",
        "title": "Harbour flat",
        "price": "450000",
        "location": "Quay",
        "beds": 2,
        "baths": 1,
        "area_sqm": 70,
        "category": "Sale",
        "type": "sale",
        "long_desc": "Sea views",
        "thumbnail": "assets/props-imgs/prop-id-P1/front.jpg",
        "image": "assets/props-imgs/prop-id-P1/front.jpg",
        "images": "assets/props-imgs/prop-id-P1/a.jpg,assets/props-imgs/prop-id-P1/b.jpg",
        "amenities": "Lift",
        "currency": "USD",
        "agent_name": "Ann",
        "agent_phone": "555",
        "featured": true,
        "short_desc": "Flat",
        "status": "Active",
    })];

    for (sheet, rows) in [
        (Sheet::Users, &users[..]),
        (Sheet::Leads, &leads[..]),
        (Sheet::Properties, &properties[..]),
    ] {
        for r in rows {
            ledger.append(sheet, row(r.clone())).await.expect("seed append");
        }
    }
}

/// Send a raw POST / with the given content type and body.
pub async fn post_raw(
    app: &Router,
    content_type: &str,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// POST an action body the way the browser client does (`text/plain`).
pub async fn post_action(app: &Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, "text/plain;charset=utf-8", body.to_string()).await
}

/// POST an authenticated action.
pub async fn call(app: &Router, token: &str, action: &str, params: Value) -> (StatusCode, Value) {
    post_action(app, json!({ "action": action, "params": params, "token": token })).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Log in and return the session token.
pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = post_action(
        app,
        json!({ "action": "login", "params": { "email": email, "password": PASSWORD } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}
