use crate::models::UserSession;
use crate::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::{json, Value};
use tower_sessions::Session;

/// Session summary for the landing page.
pub async fn index(State(state): State<AppState>, session: Session) -> Json<Value> {
    let session = UserSession::new(session);

    if !session.is_authenticated().await {
        return Json(json!({ "authenticated": false }));
    }

    Json(json!({
        "authenticated": true,
        "email": session.email().await.unwrap_or(None),
        "active_org": session.active_org().await.unwrap_or(None),
        "api_gateway_configured": state.gateway.is_configured(),
    }))
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        service_core::observability::metrics::get_metrics(),
    )
}
