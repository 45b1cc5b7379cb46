//! Postgres-backed client store.
//!
//! Expects a single table:
//!
//! ```sql
//! CREATE TABLE clients (
//!     id      uuid PRIMARY KEY,
//!     name    text NOT NULL,
//!     phone   text NOT NULL,
//!     email   text NOT NULL,
//!     comment text
//! );
//! ```
//!
//! The 255-character comment bound is enforced by the handler layer, not
//! by the schema.
//!
//! ## Error Mapping
//!
//! | SQLx error | PostgreSQL code | StoreError | Scenario |
//! |------------|-----------------|------------|----------|
//! | Database (unique violation) | `23505` | `Constraint` | Duplicate id on insert |
//! | Database (other) | any other | `Unavailable` | Query failure |
//! | PoolTimedOut / PoolClosed | n/a | `Unavailable` | Pool exhausted or shut down |
//! | per-call deadline elapsed | n/a | `Unavailable` | Statement exceeded 5 s |
//!
//! ## Timeout discipline
//!
//! Every call is bounded by [`CALL_DEADLINE`]. Pool acquisition shares the
//! same bound via `acquire_timeout`, which is the sole backpressure
//! mechanism: when all connections are checked out, acquisition fails the
//! same way a slow statement does.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Row};
use tracing::instrument;

use clientsvc_clients::{Client, ClientFields, ClientId};

use super::r#trait::{ClientStore, StoreError, StoreResult};

/// Upper bound on every store call, pool acquisition included.
pub const CALL_DEADLINE: Duration = Duration::from_secs(5);

const MAX_CONNECTIONS: u32 = 10;

/// Postgres-backed implementation of [`ClientStore`].
///
/// Clone is cheap: `PgPool` is an `Arc` internally, so one pool is shared
/// across all request tasks.
#[derive(Debug, Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database named by `dsn` and verify connectivity.
    ///
    /// The pool caps concurrently checked-out connections and applies
    /// [`CALL_DEADLINE`] to acquisition.
    pub async fn connect(dsn: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(CALL_DEADLINE)
            .connect(dsn)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect: {e}")))?;
        Ok(Self { pool })
    }

    async fn bounded<T, F>(operation: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(CALL_DEADLINE, fut).await {
            Ok(res) => res.map_err(|e| map_sqlx_error(operation, e)),
            Err(_) => Err(StoreError::Unavailable(format!(
                "{operation} exceeded {}s deadline",
                CALL_DEADLINE.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    #[instrument(skip(self, client), fields(id = %client.id), err)]
    async fn insert(&self, client: &Client) -> StoreResult<()> {
        let query = sqlx::query(
            "INSERT INTO clients (id, name, phone, email, comment) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(*client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.comment)
        .execute(&self.pool);

        Self::bounded("insert", query).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        let query = sqlx::query("SELECT id, name, phone, email, comment FROM clients WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool);

        let row = Self::bounded("find_by_id", query).await?;
        row.map(|r| row_to_client(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>> {
        // No ORDER BY on purpose: the contract promises only the store's
        // natural order.
        let query = sqlx::query("SELECT id, name, phone, email, comment FROM clients LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool);

        let rows = Self::bounded("list", query).await?;
        rows.iter().map(row_to_client).collect()
    }

    #[instrument(skip(self, fields), fields(id = %id), err)]
    async fn update(&self, id: ClientId, fields: &ClientFields) -> StoreResult<u64> {
        let query = sqlx::query(
            "UPDATE clients SET name = $1, phone = $2, email = $3, comment = $4 WHERE id = $5",
        )
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.comment)
        .bind(*id.as_uuid())
        .execute(&self.pool);

        let result = Self::bounded("update", query).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: ClientId) -> StoreResult<u64> {
        let query = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool);

        let result = Self::bounded("delete", query).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_client(row: &PgRow) -> StoreResult<Client> {
    let parsed = ClientRow::from_row(row)
        .map_err(|e| StoreError::Unavailable(format!("failed to decode client row: {e}")))?;
    Ok(parsed.into())
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Constraint(msg)
            } else {
                StoreError::Unavailable(msg)
            }
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("pool acquisition timed out in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}

#[derive(Debug)]
struct ClientRow {
    id: uuid::Uuid,
    name: String,
    phone: String,
    email: String,
    comment: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ClientRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ClientRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            comment: row.try_get("comment")?,
        })
    }
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: ClientId::from_uuid(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            comment: row.comment,
        }
    }
}
