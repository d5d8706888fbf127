use crate::models::{AuthUser, UserSession};
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Sends visitors without a logged-in session to `/login`. Otherwise the
/// [`AuthUser`] is attached to the request for the handlers.
pub async fn auth_middleware(session: Session, mut request: Request<Body>, next: Next) -> Response {
    let session = UserSession::new(session);

    let has_tokens = session.is_authenticated().await;
    let email = session.email().await.unwrap_or(None);

    match (has_tokens, email) {
        (true, Some(email)) => {
            request.extensions_mut().insert(AuthUser { email, session });
            next.run(request).await
        }
        _ => Redirect::to("/login").into_response(),
    }
}
