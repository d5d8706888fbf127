use crate::models::{AuthUser, OrganizationsView, SwitchReport, SwitchRequest};
use crate::AppState;
use axum::{extract::State, Json};

pub async fn list_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<OrganizationsView> {
    Json(
        state
            .switcher
            .list_organizations(&user.session, &user.email)
            .await,
    )
}

/// Always 200: the outcome is in the report's `status`.
pub async fn switch_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SwitchRequest>,
) -> Json<SwitchReport> {
    Json(
        state
            .switcher
            .switch_organization(&user.session, &user.email, &request.organization_id)
            .await,
    )
}
