use crate::claims::ClaimSet;
use crate::models::LoginEvent;
use crate::AppState;
use axum::{extract::State, Json};

/// `POST /hooks/post-login`: always 200, with an empty claim set when the
/// enrichment aborted.
pub async fn post_login_handler(
    State(state): State<AppState>,
    Json(event): Json<LoginEvent>,
) -> Json<ClaimSet> {
    let claims = state.enricher.on_execute_post_login(&event).await;

    tracing::info!(
        access_claims = claims.access_token.len(),
        id_claims = claims.id_token.len(),
        "Post-login hook completed"
    );

    Json(claims)
}
