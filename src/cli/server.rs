//! HTTP server exposing authors and articles as JSON:API resources

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::pagination::{PageParams, PaginationResolver};
use crate::resource::{Article, Author, Document, ErrorDocument, Resource, ResourceObject};
use crate::store::{seed_store, MemoryStore, ResourceStore};
use crate::types::{StringMap, JSONAPI_MEDIA_TYPE};

/// Attributes clients may send but the server never accepts
const READ_ONLY_ATTRIBUTES: [&str; 2] = ["created_at", "updated_at"];

/// State shared by every handler
pub struct AppState {
    store: Arc<dyn ResourceStore>,
    resolver: PaginationResolver,
}

impl AppState {
    /// Create handler state from a store and a resolver
    pub fn new(store: Arc<dyn ResourceStore>, resolver: PaginationResolver) -> Self {
        Self { store, resolver }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// A JSON:API body with the JSON:API media type
struct JsonApi<T>(StatusCode, T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.1) {
            Ok(body) => (self.0, [(header::CONTENT_TYPE, JSONAPI_MEDIA_TYPE)], body).into_response(),
            Err(e) => ApiError(Error::from(e)).into_response(),
        }
    }
}

/// Error rendered as a JSON:API error document
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self.0);
        }

        let body = ErrorDocument::from(&self.0);
        match serde_json::to_vec(&body) {
            Ok(body) => (status, [(header::CONTENT_TYPE, JSONAPI_MEDIA_TYPE)], body).into_response(),
            Err(_) => status.into_response(),
        }
    }
}

type ApiResult<T> = std::result::Result<JsonApi<T>, ApiError>;

// ============================================================================
// Router
// ============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/articles", get(list_articles))
        .route("/articles/:id", get(show_article).patch(update_article))
        .route("/authors", get(list_authors))
        .route("/authors/:id", get(show_author))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Arc::new(state))
}

/// Seed a store, bind the configured address and serve until shutdown
pub async fn serve(config: &AppConfig) -> Result<()> {
    let resolver = PaginationResolver::new(config.pagination)?;
    let store = MemoryStore::new();
    seed_store(&store, config.seed.articles).await?;

    let addr = config.server.addr().await?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    info!(
        strategy = %config.pagination.strategy,
        default_page_size = config.pagination.default_page_size,
        maximum_page_size = config.pagination.maximum_page_size,
        "Starting HTTP server on http://{}",
        addr
    );

    serve_listener(listener, AppState::new(Arc::new(store), resolver)).await
}

/// Serve on an already bound listener
pub async fn serve_listener(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StringMap>,
) -> ApiResult<Document> {
    list_resources(&state, Article::KIND, &query).await
}

async fn list_authors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StringMap>,
) -> ApiResult<Document> {
    list_resources(&state, Author::KIND, &query).await
}

async fn show_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Document> {
    show_resource(&state, Article::KIND, &id).await
}

async fn show_author(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Document> {
    show_resource(&state, Author::KIND, &id).await
}

async fn update_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Document> {
    let document: Document = serde_json::from_slice(&body).map_err(Error::from)?;
    let patch = document.into_single()?;
    check_identity(&patch, Article::KIND, &id)?;

    let mut record = state.store.find(Article::KIND, &id).await?;
    check_relationships_unchanged(&record, &patch)?;
    record.merge(strip_read_only(patch));
    // Reject edits that would leave the record undecodable
    Article::from_resource(record.clone())?;

    let saved = state.store.save(record).await?;
    info!(id = %saved.id, "Updated article");
    Ok(JsonApi(StatusCode::OK, Document::single(saved)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn list_resources(state: &AppState, kind: &str, query: &StringMap) -> ApiResult<Document> {
    let params = PageParams::from_query(query)?;
    let collection = state.store.query(kind, &StringMap::new()).await?;
    let page = state.resolver.resolve(&collection, &params);
    Ok(JsonApi(
        StatusCode::OK,
        Document::collection(page, &format!("/{kind}")),
    ))
}

async fn show_resource(state: &AppState, kind: &str, id: &str) -> ApiResult<Document> {
    let resource = state.store.find(kind, id).await?;
    Ok(JsonApi(StatusCode::OK, Document::single(resource)))
}

fn check_identity(resource: &ResourceObject, kind: &str, id: &str) -> Result<()> {
    if resource.kind != kind {
        return Err(Error::conflict(format!(
            "resource type '{}' does not match endpoint type '{kind}'",
            resource.kind
        )));
    }
    if resource.id != id {
        return Err(Error::conflict(format!(
            "resource id '{}' does not match URL id '{id}'",
            resource.id
        )));
    }
    Ok(())
}

/// Relationships are fixed at creation; a PATCH may repeat them but not change them
fn check_relationships_unchanged(current: &ResourceObject, patch: &ResourceObject) -> Result<()> {
    for (name, relationship) in &patch.relationships {
        if current.relationships.get(name) != Some(relationship) {
            return Err(Error::conflict(format!(
                "relationship '{name}' of {} '{}' cannot be changed",
                current.kind, current.id
            )));
        }
    }
    Ok(())
}

fn strip_read_only(mut resource: ResourceObject) -> ResourceObject {
    resource
        .attributes
        .retain(|name, _| !READ_ONLY_ATTRIBUTES.contains(&name.as_str()));
    resource
}
