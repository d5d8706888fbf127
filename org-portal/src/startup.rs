use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{SessionSettings, Settings};
use crate::handlers::{
    api::query_handler,
    app::{health_check, index, metrics},
    auth::{callback_handler, login_handler, logout_handler},
    organisations::{list_handler, switch_handler},
};
use crate::middleware::auth::auth_middleware;
use crate::services::{GatewayClient, IdentityClient, OrgSwitcher};
use crate::AppState;

pub fn build_router(state: AppState, session: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(session.inactivity_hours)));

    let protected = Router::new()
        .route("/organisations", get(list_handler))
        .route("/organisations/switch", post(switch_handler))
        .route("/api/query", post(query_handler))
        .route_layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_handler))
        .route("/callback", get(callback_handler))
        .route("/logout", get(logout_handler))
        .merge(protected)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Bound listener plus router, ready to serve.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Port 0 binds an ephemeral port (tests).
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let http_client = reqwest::Client::new();

        let identity = Arc::new(IdentityClient::new(http_client.clone(), settings.identity.clone()));
        let gateway = Arc::new(GatewayClient::new(http_client, settings.gateway.clone()));
        if !gateway.is_configured() {
            tracing::warn!("API gateway not configured; organisation and API calls will be refused");
        }
        let switcher = Arc::new(OrgSwitcher::new(
            identity.clone(),
            gateway.clone(),
            settings.switch.require_switch_approval,
        ));

        let router = build_router(AppState::new(identity, gateway, switcher), &settings.session);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router).await
    }
}
