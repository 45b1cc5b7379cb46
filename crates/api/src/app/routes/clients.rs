use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use clientsvc_clients::{
    validate_comment, validate_email, validate_phone, Client, ClientFields, ClientId,
};
use clientsvc_infra::ClientStore;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// POST /clients
///
/// Decode, validate, assign a fresh id, insert. Single pass, no retry.
pub async fn create_client(
    Extension(store): Extension<Arc<dyn ClientStore>>,
    body: Result<Json<dto::ClientRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected create: undecodable request body");
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", "invalid request body");
        }
    };

    if !validate_phone(&body.phone) || !validate_email(&body.email) {
        tracing::warn!(phone = %body.phone, email = %body.email, "rejected create: invalid phone or email");
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_format",
            "invalid phone or email format",
        );
    }
    if !validate_comment(body.comment.as_deref()) {
        tracing::warn!("rejected create: comment too long");
        return errors::json_error(StatusCode::BAD_REQUEST, "comment_too_long", "comment is too long");
    }

    // Any id in the body was never decoded; the record gets a fresh one.
    let client = Client::from_fields(ClientId::new(), body.into());
    tracing::info!(id = %client.id, "creating client");

    if let Err(e) = store.insert(&client).await {
        return errors::store_error_to_response("insert", e);
    }

    (StatusCode::CREATED, Json(client)).into_response()
}

/// GET /clients/:id
pub async fn get_client(
    Extension(store): Extension<Arc<dyn ClientStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // A non-UUID path id cannot match any row.
    let Ok(id) = id.parse::<ClientId>() else {
        return not_found();
    };

    match store.find_by_id(id).await {
        Ok(Some(client)) => (StatusCode::OK, Json(client)).into_response(),
        Ok(None) => not_found(),
        Err(e) => errors::store_error_to_response("find_by_id", e),
    }
}

/// GET /clients?limit=&offset=
pub async fn list_clients(
    Extension(store): Extension<Arc<dyn ClientStore>>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    let Ok(limit) = parse_page_param(params.limit.as_deref(), 10) else {
        tracing::warn!(value = ?params.limit, "invalid limit value");
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_parameter", "invalid limit value");
    };
    let Ok(offset) = parse_page_param(params.offset.as_deref(), 0) else {
        tracing::warn!(value = ?params.offset, "invalid offset value");
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_parameter", "invalid offset value");
    };

    tracing::info!(limit, offset, "listing clients");

    match store.list(limit, offset).await {
        // Always an array, possibly empty, never null.
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => errors::store_error_to_response("list", e),
    }
}

/// PUT /clients/:id
///
/// Full replace of the mutable fields. Validation order is email, phone,
/// then comment; the order is observable when several fields are invalid
/// at once.
pub async fn update_client(
    Extension(store): Extension<Arc<dyn ClientStore>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ClientRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected update: undecodable request body");
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", "invalid request body");
        }
    };

    if !validate_email(&body.email) {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_format", "invalid email format");
    }
    if !validate_phone(&body.phone) {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_format", "invalid phone format");
    }
    if !validate_comment(body.comment.as_deref()) {
        return errors::json_error(StatusCode::BAD_REQUEST, "comment_too_long", "comment is too long");
    }

    // Validation comes first: a malformed id is still a 404, but only
    // after the body has earned its 400s.
    let Ok(id) = id.parse::<ClientId>() else {
        return not_found();
    };

    let fields: ClientFields = body.into();
    match store.update(id, &fields).await {
        Ok(0) => {
            tracing::warn!(id = %id, "update target not found");
            not_found()
        }
        Ok(_) => {
            tracing::info!(id = %id, "updated client");
            // The id comes from the path, never from the body.
            (StatusCode::OK, Json(Client::from_fields(id, fields))).into_response()
        }
        Err(e) => errors::store_error_to_response("update", e),
    }
}

/// DELETE /clients/:id
pub async fn delete_client(
    Extension(store): Extension<Arc<dyn ClientStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<ClientId>() else {
        return not_found();
    };

    match store.delete(id).await {
        Ok(0) => {
            tracing::warn!(id = %id, "delete target not found");
            not_found()
        }
        Ok(_) => {
            tracing::info!(id = %id, "deleted client");
            (StatusCode::OK, "Client deleted").into_response()
        }
        Err(e) => errors::store_error_to_response("delete", e),
    }
}

fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "client not found")
}

/// Parse an optional non-negative pagination parameter.
///
/// Absent or empty means the default; anything else must parse as a
/// non-negative integer.
fn parse_page_param(raw: Option<&str>, default: i64) -> Result<i64, ()> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s.parse::<i64>().ok().filter(|v| *v >= 0).ok_or(()),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_page_param;

    #[test]
    fn page_param_defaults_when_absent_or_empty() {
        assert_eq!(parse_page_param(None, 10), Ok(10));
        assert_eq!(parse_page_param(Some(""), 7), Ok(7));
    }

    #[test]
    fn page_param_accepts_non_negative_integers() {
        assert_eq!(parse_page_param(Some("0"), 10), Ok(0));
        assert_eq!(parse_page_param(Some("42"), 10), Ok(42));
    }

    #[test]
    fn page_param_rejects_negative_and_non_numeric() {
        assert_eq!(parse_page_param(Some("-1"), 10), Err(()));
        assert_eq!(parse_page_param(Some("abc"), 10), Err(()));
        assert_eq!(parse_page_param(Some("1.5"), 10), Err(()));
    }
}
