//! In-process identity store for tests and local development.

use super::{IdentityStore, StoreError};
use crate::models::IdentityRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    records: Arc<RwLock<HashMap<i64, IdentityRecord>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl IdentityStore for MemoryIdentityStore {
    async fn upsert(&self, identifier: i64, signature: &str) -> Result<(), StoreError> {
        let record = IdentityRecord::new(identifier, signature);
        self.records.write().await.insert(identifier, record);
        Ok(())
    }

    async fn lookup(&self, identifier: i64) -> Result<Option<IdentityRecord>, StoreError> {
        Ok(self.records.read().await.get(&identifier).cloned())
    }
}
