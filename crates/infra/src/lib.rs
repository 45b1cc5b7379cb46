//! Infrastructure layer: pooled Postgres access behind the client storage boundary.

pub mod client_store;

pub use client_store::{ClientStore, InMemoryClientStore, PgClientStore, StoreError, StoreResult};
