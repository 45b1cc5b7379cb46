use std::sync::RwLock;

use async_trait::async_trait;

use clientsvc_clients::{Client, ClientFields, ClientId};

use super::r#trait::{ClientStore, StoreError, StoreResult};

/// In-memory client store.
///
/// Intended for tests/dev. Rows are kept in insertion order, which stands
/// in for the database's natural order.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    rows: RwLock<Vec<Client>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn insert(&self, client: &Client) -> StoreResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if rows.iter().any(|c| c.id == client.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate client id {}",
                client.id
            )));
        }
        rows.push(client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(rows.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn update(&self, id: ClientId, fields: &ClientFields) -> StoreResult<u64> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                *row = Client::from_fields(id, fields.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: ClientId) -> StoreResult<u64> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok((before - rows.len()) as u64)
    }
}
