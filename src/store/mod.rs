//! Resource store module
//!
//! The generic create/read/update collaborator both sides depend on.
//!
//! # Overview
//!
//! - `ResourceStore` - async find/query/save over untyped resource objects
//! - `MemoryStore` - process-local store backing the server
//! - `seed_store` - demo data (one author, a handful of articles)
//!
//! The client-side implementation, which talks to the server over HTTP,
//! lives in `client::HttpStore`.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::seed_store;

use crate::error::Result;
use crate::resource::{Resource, ResourceObject};
use crate::types::StringMap;
use async_trait::async_trait;

/// Generic create/read/update access to resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch one resource, `Error::NotFound` if absent
    async fn find(&self, kind: &str, id: &str) -> Result<ResourceObject>;

    /// Fetch the resources of a kind
    ///
    /// `params` are forwarded to the backend as query parameters; the
    /// in-memory store has no filtering and ignores them.
    async fn query(&self, kind: &str, params: &StringMap) -> Result<Vec<ResourceObject>>;

    /// Persist an existing resource, returning the stored form
    async fn save(&self, resource: ResourceObject) -> Result<ResourceObject>;
}

/// Fetch and decode a typed record
pub async fn find_record<R: Resource>(store: &dyn ResourceStore, id: &str) -> Result<R> {
    R::from_resource(store.find(R::KIND, id).await?)
}

/// Fetch and decode every record of a type
pub async fn query_records<R: Resource>(
    store: &dyn ResourceStore,
    params: &StringMap,
) -> Result<Vec<R>> {
    store
        .query(R::KIND, params)
        .await?
        .into_iter()
        .map(R::from_resource)
        .collect()
}
