use axum::{routing::get, Router};

pub mod clients;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/", get(system::health))
        .nest("/clients", clients::router())
}
