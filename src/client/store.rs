//! Resource store backed by the JSON:API server

use crate::config::ClientSettings;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::PageParams;
use crate::resource::{Document, ResourceObject};
use crate::store::ResourceStore;
use crate::types::StringMap;
use async_trait::async_trait;
use tracing::debug;

/// `ResourceStore` speaking JSON:API over HTTP
#[derive(Debug)]
pub struct HttpStore {
    client: HttpClient,
}

impl HttpStore {
    /// Wrap an HTTP client whose base URL points at the server
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build a client from the client settings
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let config = HttpClientConfig::new(&settings.base_url)?
            .with_timeout(settings.request_timeout())
            .with_max_retries(settings.max_retries);
        Ok(Self::new(HttpClient::new(config)?))
    }

    /// Fetch one page of a collection, with its meta and links
    pub async fn fetch_page(&self, kind: &str, params: &PageParams) -> Result<Document> {
        debug!(kind, ?params, "Fetching page");
        self.client
            .get(&format!("/{kind}"), &params.to_query_map())
            .await
    }
}

#[async_trait]
impl ResourceStore for HttpStore {
    async fn find(&self, kind: &str, id: &str) -> Result<ResourceObject> {
        let document: Document = self
            .client
            .get(&format!("/{kind}/{id}"), &StringMap::new())
            .await?;
        document.into_single()
    }

    async fn query(&self, kind: &str, params: &StringMap) -> Result<Vec<ResourceObject>> {
        let document: Document = self.client.get(&format!("/{kind}"), params).await?;
        document.into_collection()
    }

    async fn save(&self, resource: ResourceObject) -> Result<ResourceObject> {
        let path = format!("/{}/{}", resource.kind, resource.id);
        let document: Document = self
            .client
            .patch(&path, &Document::single(resource))
            .await?;
        document.into_single()
    }
}
