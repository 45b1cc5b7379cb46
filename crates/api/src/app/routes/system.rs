use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Unconditional liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}
