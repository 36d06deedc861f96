//! In-memory quota store for single-process operation.
//!
//! State is not persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QuotaResult, QuotaStore};
use crate::models::QuotaRecord;

#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    records: RwLock<HashMap<String, QuotaRecord>>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn get(&self, service: &str) -> QuotaResult<Option<QuotaRecord>> {
        Ok(self.records.read().await.get(service).cloned())
    }

    async fn save(&self, record: &QuotaRecord) -> QuotaResult<()> {
        self.records
            .write()
            .await
            .insert(record.service.clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> QuotaResult<Vec<QuotaRecord>> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.service.cmp(&b.service));
        Ok(records)
    }
}
