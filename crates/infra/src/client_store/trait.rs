//! The `ClientStore` trait and its error model.

use async_trait::async_trait;
use thiserror::Error;

use clientsvc_clients::{Client, ClientFields, ClientId};

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
///
/// Callers must not forward these messages to the wire; they may contain
/// driver-level detail and are meant for logs only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database constraint was violated (e.g. duplicate primary key).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The store could not serve the call: connection failure, pool
    /// exhaustion, or the per-call deadline elapsed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for client records.
///
/// Every operation is a single statement with no retries. Zero affected
/// rows from `update`/`delete` is a normal outcome, not an error; the
/// caller decides whether it means "not found".
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new record. The id must be fresh; a collision surfaces as
    /// [`StoreError::Constraint`].
    async fn insert(&self, client: &Client) -> StoreResult<()>;

    /// Fetch the record with the given id, or `None` if no row matches.
    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>>;

    /// Fetch up to `limit` records starting at `offset`, in the store's
    /// natural order. Callers must not assume a stable order across calls.
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>>;

    /// Replace the mutable fields of the record with the given id.
    /// Returns the affected-row count (0 meaning no such id).
    async fn update(&self, id: ClientId, fields: &ClientFields) -> StoreResult<u64>;

    /// Hard-delete the record with the given id. Returns the affected-row
    /// count (0 meaning no such id).
    async fn delete(&self, id: ClientId) -> StoreResult<u64>;
}
