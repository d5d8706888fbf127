#![allow(dead_code)]

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use claims_hook::config::Settings;
use claims_hook::startup::Application;
use serde_json::{json, Value};
use service_core::config::{ServerSettings, TelemetrySettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetrySettings::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
        }
    }

    pub async fn post_login(&self, event: &Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/hooks/post-login", self.address))
            .json(event)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// How the mock identity provider and backend answer.
#[derive(Clone)]
pub struct UpstreamBehavior {
    pub token_status: StatusCode,
    pub backend_status: StatusCode,
    pub account: Value,
}

impl Default for UpstreamBehavior {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            backend_status: StatusCode::OK,
            account: json!({
                "accountId": "acc_123",
                "organisation": { "id": "org_1", "name": "Acme" },
                "roles": ["admin"],
                "isSystemLevel": false
            }),
        }
    }
}

#[derive(Clone)]
struct UpstreamState {
    behavior: UpstreamBehavior,
    token_calls: Arc<AtomicUsize>,
    backend_calls: Arc<AtomicUsize>,
    token_bodies: Arc<Mutex<Vec<Value>>>,
    backend_bodies: Arc<Mutex<Vec<Value>>>,
    backend_auth: Arc<Mutex<Vec<String>>>,
}

/// Identity provider (`/oauth/token`) and backend (`/account-context`)
/// served from one ephemeral port.
pub struct MockUpstream {
    pub address: String,
    state: UpstreamState,
}

impl MockUpstream {
    pub async fn spawn(behavior: UpstreamBehavior) -> Self {
        let state = UpstreamState {
            behavior,
            token_calls: Arc::new(AtomicUsize::new(0)),
            backend_calls: Arc::new(AtomicUsize::new(0)),
            token_bodies: Arc::new(Mutex::new(Vec::new())),
            backend_bodies: Arc::new(Mutex::new(Vec::new())),
            backend_auth: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/oauth/token", post(token))
            .route("/account-context", post(account_context))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self { address, state }
    }

    pub fn secrets(&self) -> Value {
        json!({
            "BACKEND_URL": format!("{}/account-context", self.address),
            "DOMAIN": self.address,
            "CLIENT_ID": "hook-client",
            "CLIENT_SECRET": "hook-secret",
            "AUDIENCE": "https://api.example.com"
        })
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn backend_calls(&self) -> usize {
        self.state.backend_calls.load(Ordering::SeqCst)
    }

    pub fn token_bodies(&self) -> Vec<Value> {
        self.state.token_bodies.lock().unwrap().clone()
    }

    pub fn backend_bodies(&self) -> Vec<Value> {
        self.state.backend_bodies.lock().unwrap().clone()
    }

    pub fn backend_auth(&self) -> Vec<String> {
        self.state.backend_auth.lock().unwrap().clone()
    }
}

async fn token(State(state): State<UpstreamState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    state.token_bodies.lock().unwrap().push(body);

    let status = state.behavior.token_status;
    if status.is_success() {
        (
            status,
            Json(json!({ "access_token": "service-token", "token_type": "Bearer", "expires_in": 86400 })),
        )
    } else {
        (status, Json(json!({ "error": "server_error" })))
    }
}

async fn account_context(
    State(state): State<UpstreamState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.backend_calls.fetch_add(1, Ordering::SeqCst);
    state.backend_bodies.lock().unwrap().push(body);
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.backend_auth.lock().unwrap().push(auth.to_string());
    }

    let status = state.behavior.backend_status;
    if status.is_success() {
        (status, Json(state.behavior.account.clone()))
    } else {
        (status, Json(json!({ "error": "lookup failed" })))
    }
}

pub fn login_event(secrets: Value) -> Value {
    json!({
        "user": { "email": "jane@example.com" },
        "request": { "query": {} },
        "secrets": secrets
    })
}
