//! In-process fake of the auth REST API and the content store HTTP API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use fu_admin::config::AppConfig;
use fu_admin::content::SanityStore;
use fu_admin::http::Gateway;
use fu_admin::notify::MemoryNotifier;
use fu_admin::routes::{MemoryNavigator, Route};
use fu_admin::session::Session;
use fu_admin::auth::AuthApi;

pub const ADMIN_EMAIL: &str = "ada@friendsunited.org";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const SESSION_TOKEN: &str = "good-token";
pub const CONTENT_TOKEN: &str = "sanity-token";
pub const VALID_OTP: &str = "123456";
pub const API_VERSION: &str = "2025-01-01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct BackendState {
    pub requests: Vec<Recorded>,
    pub documents: Vec<Value>,
    next_id: usize,
}

type Shared = Arc<Mutex<BackendState>>;

#[derive(Clone)]
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
}

impl FakeBackend {
    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    /// `"METHOD /path"` for every request, in arrival order
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn documents(&self, doc_type: &str) -> Vec<Value> {
        self.lock()
            .documents
            .iter()
            .filter(|d| d["_type"] == doc_type)
            .cloned()
            .collect()
    }

    /// Config pointing both APIs at this backend
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = format!("{}/api", self.base_url);
        config.api.request_timeout_secs = 5;
        config.content.api_host = Some(self.base_url.clone());
        config.content.api_version = API_VERSION.to_string();
        config.content.dataset = "test".to_string();
        config.content.token = Some(CONTENT_TOKEN.to_string());
        config
    }
}

pub async fn spawn_backend() -> Result<FakeBackend> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind fake backend")?;

    let state: Shared = Arc::new(Mutex::new(BackendState::default()));
    let app = router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(FakeBackend {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
    })
}

/// Library objects wired against a fresh fake backend
pub struct Harness {
    pub backend: FakeBackend,
    pub session: Session,
    pub notifier: MemoryNotifier,
    pub navigator: Arc<MemoryNavigator>,
    pub api: Gateway,
    pub store: SanityStore,
}

impl Harness {
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.api.clone())
    }
}

pub async fn harness(session: Session) -> Result<Harness> {
    let backend = spawn_backend().await?;
    let config = backend.app_config();
    let notifier = MemoryNotifier::new();
    let navigator = Arc::new(MemoryNavigator::starting_at(Route::Dashboard));

    let api = Gateway::new(
        config.api.base_url.clone(),
        config.request_timeout(),
        session.clone(),
        Arc::new(notifier.clone()),
        navigator.clone(),
    )?;
    let content = Gateway::new(
        config.content.api_base_url(),
        config.request_timeout(),
        session.clone(),
        Arc::new(notifier.clone()),
        navigator.clone(),
    )?;
    let store = SanityStore::from_config(content, &config.content);

    Ok(Harness {
        backend,
        session,
        notifier,
        navigator,
        api,
        store,
    })
}

fn router(state: Shared) -> Router {
    let sanity = format!("/v{}", API_VERSION);
    Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/me", get(me))
        .route("/api/users", post(create_user))
        .route("/api/users/forgot-password", post(send_otp))
        .route("/api/auth/forgot-password", post(send_otp))
        .route("/api/auth/verify-reset-otp", post(verify_otp))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/broken", get(broken).post(broken))
        .route("/api/admin-only", get(forbidden).post(forbidden))
        .route(&format!("{}/data/query/:dataset", sanity), get(query))
        .route(&format!("{}/data/mutate/:dataset", sanity), post(mutate))
        .route(&format!("{}/assets/images/:dataset", sanity), post(upload))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().requests.push(Recorded {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == ADMIN_EMAIL && body["password"] == ADMIN_PASSWORD {
        Json(json!({ "success": true, "data": { "token": SESSION_TOKEN } })).into_response()
    } else {
        failure(StatusCode::BAD_REQUEST, "Invalid email or password")
    }
}

async fn me(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(SESSION_TOKEN) => Json(json!({
            "success": true,
            "data": { "_id": "u-1", "name": "Ada Admin", "email": ADMIN_EMAIL, "role": "admin" }
        }))
        .into_response(),
        _ => failure(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn create_user(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != Some(SESSION_TOKEN) {
        return failure(StatusCode::UNAUTHORIZED, "Token expired");
    }
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "_id": "u-2", "name": body["name"], "email": body["email"] } })),
    )
        .into_response()
}

async fn send_otp(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    Json(json!({ "success": true, "message": format!("OTP sent to {}", email) })).into_response()
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["otp"] == VALID_OTP {
        Json(json!({ "success": true, "message": "OTP verified" })).into_response()
    } else {
        failure(StatusCode::BAD_REQUEST, "Invalid or expired OTP")
    }
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["otp"] != VALID_OTP {
        return failure(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    Json(json!({ "success": true, "message": "Password reset successful" })).into_response()
}

async fn broken() -> Response {
    failure(StatusCode::INTERNAL_SERVER_ERROR, "database down")
}

async fn forbidden() -> Response {
    StatusCode::FORBIDDEN.into_response()
}

/// Understands exactly the GROQ shapes the content store client sends
async fn query(
    State(state): State<Shared>,
    Path(_dataset): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let groq = params.get("query").cloned().unwrap_or_default();
    let param = |name: &str| {
        params
            .get(&format!("${}", name))
            .and_then(|raw| serde_json::from_str::<String>(raw).ok())
    };
    let doc_type = param("type");
    let id = param("id");

    let state = state.lock().unwrap();
    let mut matching: Vec<Value> = state
        .documents
        .iter()
        .filter(|d| doc_type.as_deref().map_or(true, |t| d["_type"] == t))
        .filter(|d| id.as_deref().map_or(true, |i| d["_id"] == i))
        .cloned()
        .collect();

    let result = if groq.starts_with("count(") {
        json!(matching.len())
    } else if groq.ends_with("[0]") {
        matching.into_iter().next().unwrap_or(Value::Null)
    } else {
        if groq.contains("order(_createdAt desc)") {
            matching.reverse();
        }
        Value::Array(matching)
    };

    Json(json!({ "ms": 1, "query": groq, "result": result })).into_response()
}

async fn mutate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_dataset): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers) != Some(CONTENT_TOKEN) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized - Session not found");
    }

    let mut state = state.lock().unwrap();
    let mut results = Vec::new();
    let now = chrono::Utc::now().to_rfc3339();

    for mutation in body["mutations"].as_array().cloned().unwrap_or_default() {
        if let Some(create) = mutation.get("create") {
            state.next_id += 1;
            let id = format!("doc-{}", state.next_id);
            let mut doc = create.clone();
            doc["_id"] = json!(id);
            doc["_rev"] = json!("r1");
            doc["_createdAt"] = json!(now);
            doc["_updatedAt"] = json!(now);
            state.documents.push(doc.clone());
            results.push(json!({ "id": id, "operation": "create", "document": doc }));
        } else if let Some(patch) = mutation.get("patch") {
            let id = patch["id"].as_str().unwrap_or_default().to_string();
            let Some(doc) = state.documents.iter_mut().find(|d| d["_id"] == id.as_str()) else {
                return failure(StatusCode::NOT_FOUND, "Document not found");
            };
            if let Some(set) = patch["set"].as_object() {
                for (key, value) in set {
                    doc[key.as_str()] = value.clone();
                }
            }
            if let (Some(unset), Some(fields)) = (patch["unset"].as_array(), doc.as_object_mut()) {
                for key in unset.iter().filter_map(Value::as_str) {
                    fields.remove(key);
                }
            }
            doc["_updatedAt"] = json!(now);
            results.push(json!({ "id": id, "operation": "update", "document": doc.clone() }));
        } else if let Some(delete) = mutation.get("delete") {
            let id = delete["id"].as_str().unwrap_or_default().to_string();
            state.documents.retain(|d| d["_id"] != id.as_str());
            results.push(json!({ "id": id, "operation": "delete" }));
        }
    }

    Json(json!({ "transactionId": "tx-1", "results": results })).into_response()
}

async fn upload(
    State(_state): State<Shared>,
    headers: HeaderMap,
    Path(_dataset): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    if bearer(&headers) != Some(CONTENT_TOKEN) {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized - Session not found");
    }

    let ext = match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        Some("image/svg+xml") => "svg",
        _ => "jpg",
    };
    let sha = format!("{:x}", Sha256::digest(&body));
    let id = format!("image-{}-1x1-{}", &sha[..16], ext);

    Json(json!({
        "document": {
            "_id": id,
            "_type": "sanity.imageAsset",
            "originalFilename": params.get("filename"),
            "size": body.len()
        }
    }))
    .into_response()
}
