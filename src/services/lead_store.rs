use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::lead::LeadRecord;

/// Document store receiving contact-form leads.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persist one record. No retry on failure.
    async fn insert(&self, record: LeadRecord) -> Result<(), StoreError>;

    /// Records known to this store, newest first.
    async fn list(&self) -> Result<Vec<LeadRecord>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryLeadStore {
    records: Arc<RwLock<Vec<LeadRecord>>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, record: LeadRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let mut out = records.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }
}

/// Posts each record as JSON to a collection endpoint of a remote document
/// store. Records are also kept locally so the admin listing stays
/// available without a read API on the remote side.
#[derive(Clone, Debug)]
pub struct HttpLeadStore {
    client: Client,
    endpoint: String,
    local: MemoryLeadStore,
}

impl HttpLeadStore {
    pub fn new(client: Client, endpoint: &str) -> Self {
        info!(endpoint = endpoint, "HTTP lead store initialized");
        Self {
            client,
            endpoint: endpoint.to_string(),
            local: MemoryLeadStore::new(),
        }
    }
}

#[async_trait]
impl LeadStore for HttpLeadStore {
    async fn insert(&self, record: LeadRecord) -> Result<(), StoreError> {
        debug!(endpoint = %self.endpoint, id = %record.id, "storing lead");
        let response = self.client.post(&self.endpoint).json(&record).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(status.as_u16()));
        }
        self.local.insert(record).await
    }

    async fn list(&self) -> Result<Vec<LeadRecord>, StoreError> {
        self.local.list().await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.local.count().await
    }
}
