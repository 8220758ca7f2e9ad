//! In-memory resource store
//!
//! Resources are kept per kind in insertion order behind a tokio `RwLock`, so
//! concurrent readers never block each other.

use super::ResourceStore;
use crate::error::{Error, Result};
use crate::resource::ResourceObject;
use crate::types::StringMap;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Attribute refreshed on every successful save, when the resource has it
const UPDATED_AT: &str = "updated_at";

/// Process-local resource store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Vec<ResourceObject>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new resource; `Error::Conflict` if the id is taken
    pub async fn insert(&self, resource: ResourceObject) -> Result<()> {
        let mut records = self.records.write().await;
        let bucket = records.entry(resource.kind.clone()).or_default();
        if bucket.iter().any(|r| r.id == resource.id) {
            return Err(Error::conflict(format!(
                "{} '{}' already exists",
                resource.kind, resource.id
            )));
        }
        debug!(kind = %resource.kind, id = %resource.id, "Inserted resource");
        bucket.push(resource);
        Ok(())
    }

    /// Number of stored resources of a kind
    pub async fn count(&self, kind: &str) -> usize {
        self.records.read().await.get(kind).map_or(0, Vec::len)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find(&self, kind: &str, id: &str) -> Result<ResourceObject> {
        let records = self.records.read().await;
        records
            .get(kind)
            .and_then(|bucket| bucket.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| Error::not_found(kind, id))
    }

    async fn query(&self, kind: &str, _params: &StringMap) -> Result<Vec<ResourceObject>> {
        let records = self.records.read().await;
        Ok(records.get(kind).cloned().unwrap_or_default())
    }

    async fn save(&self, mut resource: ResourceObject) -> Result<ResourceObject> {
        let mut records = self.records.write().await;
        let slot = records
            .get_mut(&resource.kind)
            .and_then(|bucket| bucket.iter_mut().find(|r| r.id == resource.id))
            .ok_or_else(|| Error::not_found(&resource.kind, &resource.id))?;

        if resource.attributes.contains_key(UPDATED_AT) {
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
            resource.attributes.insert(UPDATED_AT.to_string(), now.into());
        }

        debug!(kind = %resource.kind, id = %resource.id, "Saved resource");
        *slot = resource.clone();
        Ok(resource)
    }
}
