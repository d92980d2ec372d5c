//! HashMap-backed `RecordStore` for local runs and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{ProductFields, Record};
use crate::store::RecordStore;

/// In-memory product store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn put(&self, id: &str, fields: &ProductFields) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("product store lock poisoned"))?;

        records.insert(id.to_string(), fields.to_record(id));
        tracing::debug!("Stored product with id: {}", id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("product store lock poisoned"))?;

        Ok(records.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("product store lock poisoned"))?;

        records.remove(id);
        tracing::debug!("Deleted product with id: {}", id);
        Ok(())
    }

    async fn scan_limited(&self, limit: usize) -> Result<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("product store lock poisoned"))?;

        Ok(records.values().take(limit).cloned().collect())
    }

    async fn health_check(&self) -> Result<()> {
        self.records
            .read()
            .map(|_| ())
            .map_err(|_| anyhow!("product store lock poisoned"))
    }
}
