//! Client storage boundary.
//!
//! This module defines an infrastructure-facing abstraction for persisting
//! client records without making any storage assumptions, plus a Postgres
//! implementation for production and an in-memory one for tests/dev.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryClientStore;
pub use postgres::PgClientStore;
pub use r#trait::{ClientStore, StoreError, StoreResult};
