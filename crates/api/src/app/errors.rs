use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use clientsvc_infra::StoreError;

/// Convert a store failure into the generic 500 response.
///
/// The driver-level detail goes to the log with the failing operation;
/// the caller only ever sees "internal server error".
pub fn store_error_to_response(operation: &'static str, err: StoreError) -> axum::response::Response {
    tracing::error!(operation, error = %err, "store call failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
