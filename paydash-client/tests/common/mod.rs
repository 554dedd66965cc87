//! In-process backend used by the integration tests.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use paydash_client::{
    ApiClient, Navigator, SessionStore, Storage, StorageError,
    session::TOKEN_KEY,
    storage::MemoryStorage,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const VALID_TOKEN: &str = "token-abc";
pub const STALE_TOKEN: &str = "token-stale";
pub const FLAKY_TOKEN: &str = "token-flaky";

/// Counters observed by the tests.
#[derive(Debug, Default)]
pub struct BackendCalls {
    pub logout: AtomicUsize,
    pub me: AtomicUsize,
}

pub fn profile_json(business_id: i64) -> Value {
    json!({
        "id": 42,
        "name": "Ada Merchant",
        "email": "ada@example.com",
        "roles": ["finance"],
        "permissions": ["wallets.view", "settlements.view"],
        "business_id": business_id
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn me(State(calls): State<Arc<BackendCalls>>, headers: HeaderMap) -> Response {
    calls.me.fetch_add(1, Ordering::SeqCst);
    match bearer(&headers) {
        Some(VALID_TOKEN) => Json(profile_json(1)).into_response(),
        Some(FLAKY_TOKEN) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
            .into_response(),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        ("ada@example.com", "correct") => Json(json!({
            "token": VALID_TOKEN,
            "expires_at": (Utc::now() + chrono::Duration::hours(1)).to_rfc3339(),
            "user": profile_json(1)
        }))
        .into_response(),
        ("", _) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The email field is required.",
                "errors": { "email": ["The email field is required."] }
            })),
        )
            .into_response(),
        ("broken@example.com", _) => Json(json!({ "unexpected": true })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The email has already been taken.",
                "errors": { "email": "The email has already been taken." }
            })),
        )
            .into_response();
    }
    Json(json!({
        "token": VALID_TOKEN,
        "user": {
            "id": 77,
            "name": body["name"],
            "email": body["email"],
            "roles": ["owner"],
            "permissions": [],
            "business_id": null
        }
    }))
    .into_response()
}

async fn logout(State(calls): State<Arc<BackendCalls>>, headers: HeaderMap) -> Response {
    calls.logout.fetch_add(1, Ordering::SeqCst);
    match bearer(&headers) {
        Some(STALE_TOKEN) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
            .into_response(),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn businesses() -> Json<Value> {
    Json(json!({
        "data": [
            { "id": 1, "name": "Ada Retail", "status": "active" },
            { "id": 2, "name": "Ada Wholesale" }
        ]
    }))
}

async fn switch_business(Json(body): Json<Value>) -> Response {
    match body["business_id"].as_i64() {
        Some(id @ (1 | 2)) => Json(profile_json(id)).into_response(),
        Some(3) => StatusCode::NO_CONTENT.into_response(),
        _ => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "You do not belong to this business." })),
        )
            .into_response(),
    }
}

async fn transactions(Query(params): Query<HashMap<String, u32>>) -> Json<Value> {
    let page = params.get("page").copied().unwrap_or(1);
    let per_page = params.get("per_page").copied().unwrap_or(10);
    let total = 25_u32;
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    let data: Vec<u32> = (start..end).collect();
    Json(json!({
        "data": data,
        "meta": {
            "current_page": page,
            "per_page": per_page,
            "total": total,
            "last_page": total.div_ceil(per_page)
        }
    }))
}

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "authorization": bearer(&headers) }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({ "done": true }))
}

async fn always_unauthorized() -> Response {
    tokio::time::sleep(Duration::from_millis(50)).await;
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired." })),
    )
        .into_response()
}

fn router(calls: Arc<BackendCalls>) -> Router {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/switch-business", post(switch_business))
        .route("/api/businesses", get(businesses))
        .route("/api/transactions", get(transactions))
        .route("/api/echo-auth", get(echo_auth))
        .route("/api/slow", get(slow))
        .route("/api/expired", get(always_unauthorized))
        .route("/api/empty", post(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/api/request-timeout",
            get(|| async { StatusCode::REQUEST_TIMEOUT }),
        )
        .route(
            "/api/bad-gateway",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        )
        .route(
            "/api/validation",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "message": "The amount must be at least 100.",
                        "errors": { "amount": ["The amount must be at least 100."] }
                    })),
                )
            }),
        )
        .with_state(calls)
}

/// Starts the backend on an ephemeral port and returns its API base URL.
pub async fn spawn_backend() -> (Url, Arc<BackendCalls>) {
    let calls = Arc::new(BackendCalls::default());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let app = router(calls.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test backend");
    });
    let base = Url::parse(&format!("http://{addr}/api/")).expect("base url");
    (base, calls)
}

/// Navigator counting redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub redirects: AtomicUsize,
}

impl Navigator for RecordingNavigator {
    fn redirect_to_root(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Memory storage counting how often the token key is removed.
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    pub token_removals: AtomicUsize,
}

impl Storage for CountingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if key == TOKEN_KEY {
            self.token_removals.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.remove_item(key)
    }
}

/// Everything a test needs to drive the client and observe side effects.
pub struct Harness {
    pub client: ApiClient,
    pub session: SessionStore,
    pub storage: Arc<CountingStorage>,
    pub navigator: Arc<RecordingNavigator>,
    pub calls: Arc<BackendCalls>,
}

pub async fn harness() -> Harness {
    harness_with_timeout(Duration::from_secs(5)).await
}

pub async fn harness_with_timeout(timeout: Duration) -> Harness {
    let (base, calls) = spawn_backend().await;
    let storage = Arc::new(CountingStorage::default());
    let session = SessionStore::new(storage.clone());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::with_base_url(base, timeout, session.clone(), navigator.clone())
        .expect("client");
    Harness {
        client,
        session,
        storage,
        navigator,
        calls,
    }
}
