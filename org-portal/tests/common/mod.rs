#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use org_portal::config::{
    GatewaySettings, IdentityProviderSettings, SessionSettings, Settings, SwitchSettings,
};
use org_portal::startup::Application;
use reqwest::{redirect::Policy, Url};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::{ServerSettings, TelemetrySettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const USER_EMAIL: &str = "jane@example.com";

pub fn unsigned_jwt(claims: &Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

fn organisation_claim(organization_id: &str) -> Option<Value> {
    match organization_id {
        "org_1" => Some(json!({ "id": "org_1", "name": "Globex" })),
        "org_2" => Some(json!({ "id": "org_2", "name": "Acme" })),
        _ => None,
    }
}

fn token_for(organization_id: Option<&str>) -> String {
    let mut claims = json!({ "sub": "auth0|jane", "email": USER_EMAIL });
    if let Some(org) = organization_id.and_then(organisation_claim) {
        claims["organisation"] = org;
    }
    unsigned_jwt(&claims)
}

/// How the mock identity provider and gateway answer.
#[derive(Clone)]
pub struct UpstreamBehavior {
    pub prepare_switch_status: StatusCode,
    pub organisations_status: StatusCode,
    pub organisations: Value,
    /// Answer `/public` with a body that is not JSON.
    pub public_not_json: bool,
}

impl Default for UpstreamBehavior {
    fn default() -> Self {
        Self {
            prepare_switch_status: StatusCode::OK,
            organisations_status: StatusCode::OK,
            public_not_json: false,
            organisations: json!({
                "data": [
                    { "organisation": { "id": "org_1", "name": "Globex" } },
                    { "organisation": { "id": "org_2", "name": "Acme" } }
                ]
            }),
        }
    }
}

#[derive(Clone)]
struct UpstreamState {
    behavior: UpstreamBehavior,
    refresh_calls: Arc<AtomicUsize>,
    prepare_calls: Arc<AtomicUsize>,
    token_bodies: Arc<Mutex<Vec<Value>>>,
    public_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn token_endpoint(State(state): State<UpstreamState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.token_bodies.lock().unwrap().push(body.clone());

    match body["grant_type"].as_str() {
        Some("authorization_code") => (
            StatusCode::OK,
            Json(json!({
                "access_token": token_for(Some("org_1")),
                "id_token": token_for(Some("org_1")),
                "refresh_token": "rt-1",
                "expires_in": 3600
            })),
        ),
        Some("refresh_token") => {
            state.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let access_token = token_for(body["organization"].as_str());
            (
                StatusCode::OK,
                Json(json!({ "access_token": access_token, "expires_in": 3600 })),
            )
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "unsupported_grant_type" }))),
    }
}

async fn organisations_endpoint(State(state): State<UpstreamState>) -> (StatusCode, Json<Value>) {
    (
        state.behavior.organisations_status,
        Json(state.behavior.organisations.clone()),
    )
}

async fn prepare_switch_endpoint(State(state): State<UpstreamState>) -> StatusCode {
    state.prepare_calls.fetch_add(1, Ordering::SeqCst);
    state.behavior.prepare_switch_status
}

async fn public_endpoint(State(state): State<UpstreamState>, Json(body): Json<Value>) -> Response {
    state.public_bodies.lock().unwrap().push(body.clone());
    if state.behavior.public_not_json {
        return (StatusCode::OK, "<html>gateway timeout page</html>").into_response();
    }
    (StatusCode::ACCEPTED, Json(json!({ "received": body }))).into_response()
}

/// Identity provider and API gateway in one server.
pub struct MockUpstream {
    pub address: String,
    state: UpstreamState,
}

impl MockUpstream {
    pub async fn spawn(behavior: UpstreamBehavior) -> Self {
        let state = UpstreamState {
            behavior,
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            prepare_calls: Arc::new(AtomicUsize::new(0)),
            token_bodies: Arc::new(Mutex::new(Vec::new())),
            public_bodies: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/oauth/token", post(token_endpoint))
            .route("/auth/organisations", post(organisations_endpoint))
            .route("/auth/prepare-switch", post(prepare_switch_endpoint))
            .route("/public", post(public_endpoint))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        MockUpstream {
            address: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn prepare_calls(&self) -> usize {
        self.state.prepare_calls.load(Ordering::SeqCst)
    }

    pub fn token_bodies(&self) -> Vec<Value> {
        self.state.token_bodies.lock().unwrap().clone()
    }

    pub fn public_bodies(&self) -> Vec<Value> {
        self.state.public_bodies.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(upstream: &MockUpstream, require_switch_approval: bool) -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetrySettings::default(),
            identity: IdentityProviderSettings {
                domain: upstream.address.clone(),
                client_id: "portal".to_string(),
                client_secret: Secret::new("portal-secret".to_string()),
                audience: "https://api.example.com".to_string(),
                redirect_uri: "http://127.0.0.1/callback".to_string(),
                logout_return_to: "http://127.0.0.1/".to_string(),
            },
            gateway: GatewaySettings {
                api_gateway: Some(upstream.address.clone()),
            },
            switch: SwitchSettings {
                require_switch_approval,
            },
            session: SessionSettings::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to build client");

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Walks `/login` and `/callback` the way a browser would.
    pub async fn login(&self) {
        let response = self
            .client
            .get(self.url("/login"))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_redirection());

        let location = response.headers()["location"].to_str().unwrap().to_string();
        let authorize = Url::parse(&location).unwrap();
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("authorize URL carries a state");

        let response = self
            .client
            .get(self.url("/callback"))
            .query(&[("code", "auth-code"), ("state", state.as_str())])
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()["location"], "/");
    }

    pub async fn switch(&self, organization_id: &str) -> Value {
        self.client
            .post(self.url("/organisations/switch"))
            .json(&json!({ "organization_id": organization_id }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .unwrap()
    }

    pub async fn organisations(&self) -> Value {
        self.client
            .get(self.url("/organisations"))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .unwrap()
    }
}
