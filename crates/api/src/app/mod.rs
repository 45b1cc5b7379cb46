//! HTTP API application wiring (Axum router + handler wiring).
//!
//! This folder is structured like:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use clientsvc_infra::ClientStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// The store handle is injected once at composition time; handlers share
/// it through an extension layer. There is no other state crossing
/// requests.
pub fn build_app(store: Arc<dyn ClientStore>) -> Router {
    routes::router().layer(Extension(store))
}
