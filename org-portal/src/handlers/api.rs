use crate::models::{ApiQuery, AuthUser};
use crate::services::GetTokenOptions;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

/// `POST /api/query`: validate the payload, then forward it to the gateway's
/// `/public` endpoint and relay the answer.
pub async fn query_handler(
    State(state): State<AppState>,
    user: AuthUser,
    body: String,
) -> Result<Response, AppError> {
    let query = ApiQuery::parse(&body)?;

    let token = state
        .identity
        .get_access_token_silently(&user.session, GetTokenOptions::default())
        .await?;

    let response = state.gateway.call_public(&token, query).await.map_err(|e| {
        tracing::error!(error = %e, "Protected API call failed");
        e
    })?;

    Ok((response.status, Json(response.body)).into_response())
}
