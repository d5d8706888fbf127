use axum::{http::header, response::IntoResponse};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        service_core::observability::metrics::get_metrics(),
    )
}
