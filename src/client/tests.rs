//! Tests for the client module

use super::*;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{PageMeta, PageParams};
use crate::resource::{Article, Resource, ResourceObject};
use crate::store::{seed_store, MemoryStore, ResourceStore};
use crate::types::StringMap;
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test stores
// ============================================================================

/// Memory store whose saves can be made to fail or stall
struct FlakyStore {
    inner: MemoryStore,
    reject: AtomicBool,
    stall: Option<Duration>,
    saves: AtomicUsize,
}

impl FlakyStore {
    async fn seeded() -> Self {
        let inner = MemoryStore::new();
        seed_store(&inner, 5).await.unwrap();
        Self {
            inner,
            reject: AtomicBool::new(false),
            stall: None,
            saves: AtomicUsize::new(0),
        }
    }

    fn rejecting(self) -> Self {
        self.reject.store(true, Ordering::SeqCst);
        self
    }

    fn stalling(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }
}

#[async_trait]
impl ResourceStore for FlakyStore {
    async fn find(&self, kind: &str, id: &str) -> Result<ResourceObject> {
        self.inner.find(kind, id).await
    }

    async fn query(&self, kind: &str, params: &StringMap) -> Result<Vec<ResourceObject>> {
        self.inner.query(kind, params).await
    }

    async fn save(&self, resource: ResourceObject) -> Result<ResourceObject> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if let Some(stall) = self.stall {
            tokio::time::sleep(stall).await;
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(Error::http_status(500, "database unavailable"));
        }
        let mut record = self.inner.find(&resource.kind, &resource.id).await?;
        record.merge(resource);
        self.inner.save(record).await
    }
}

fn controller(store: Arc<FlakyStore>, id: &str) -> (EditController, UnboundedReceiver<Route>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EditController::new(store, tx, id), rx)
}

// ============================================================================
// Edit lifecycle
// ============================================================================

#[tokio::test]
async fn test_load_edit_save_navigates_once() {
    let store = Arc::new(FlakyStore::seeded().await);
    let (mut controller, mut rx) = controller(Arc::clone(&store), "1");
    assert_eq!(controller.phase(), EditPhase::Loading);

    let loaded = controller.load().await.unwrap();
    assert_eq!(loaded.title, "A Wizard of Earthsea");
    assert_eq!(controller.phase(), EditPhase::Editing);

    controller.set_title("The Farthest Shore").unwrap();
    controller.save().await.unwrap();

    assert_eq!(controller.phase(), EditPhase::Done);
    assert_eq!(rx.try_recv().unwrap(), Route::Articles);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);

    let stored = Article::from_resource(store.find("articles", "1").await.unwrap()).unwrap();
    assert_eq!(stored.title, "The Farthest Shore");
    assert_eq!(controller.working_copy(), Some(&stored));
}

#[tokio::test]
async fn test_rejected_save_keeps_draft_and_stays() {
    let store = Arc::new(FlakyStore::seeded().await.rejecting());
    let (mut controller, mut rx) = controller(Arc::clone(&store), "1");

    controller.load().await.unwrap();
    controller.set_title("Tehanu").unwrap();
    controller.set_body("Draft body").unwrap();

    let err = controller.save().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(controller.phase(), EditPhase::Failed);
    assert!(controller.failure().unwrap().contains("database unavailable"));

    let draft = controller.working_copy().unwrap();
    assert_eq!(draft.title, "Tehanu");
    assert_eq!(draft.body, "Draft body");
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    let stored = store.find("articles", "1").await.unwrap();
    assert_eq!(stored.attributes["title"], "A Wizard of Earthsea");
}

#[tokio::test]
async fn test_retry_after_failure() {
    let store = Arc::new(FlakyStore::seeded().await.rejecting());
    let (mut controller, mut rx) = controller(Arc::clone(&store), "2");

    controller.load().await.unwrap();
    controller.set_title("Retried").unwrap();
    assert!(controller.save().await.is_err());

    store.reject.store(false, Ordering::SeqCst);
    controller.save().await.unwrap();

    assert_eq!(controller.phase(), EditPhase::Done);
    assert!(controller.failure().is_none());
    assert_eq!(rx.try_recv().unwrap(), Route::Articles);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(store.saves.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_edit_after_failure_returns_to_editing() {
    let store = Arc::new(FlakyStore::seeded().await.rejecting());
    let (mut controller, _rx) = controller(store, "1");

    controller.load().await.unwrap();
    let _ = controller.save().await;
    assert_eq!(controller.phase(), EditPhase::Failed);

    controller.set_body("More words").unwrap();
    assert_eq!(controller.phase(), EditPhase::Editing);
    assert!(controller.failure().is_none());
}

#[tokio::test]
async fn test_save_timeout_counts_as_failure() {
    let store = Arc::new(
        FlakyStore::seeded()
            .await
            .stalling(Duration::from_secs(5)),
    );
    let (controller, mut rx) = controller(store, "1");
    let mut controller = controller.with_save_timeout(Duration::from_millis(20));

    controller.load().await.unwrap();
    controller.set_title("Slow").unwrap();

    let err = controller.save().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 20 }));
    assert_eq!(controller.phase(), EditPhase::Failed);
    assert_eq!(controller.working_copy().unwrap().title, "Slow");
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let store = Arc::new(FlakyStore::seeded().await);
    let (mut controller, mut rx) = controller(store, "99");

    let err = controller.load().await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(controller.phase(), EditPhase::LoadFailed);
    assert!(controller.working_copy().is_none());
    assert!(controller.failure().is_some());

    assert!(matches!(
        controller.save().await,
        Err(Error::InvalidTransition { .. })
    ));
    assert!(controller.set_title("x").is_err());
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_transitions_out_of_order_are_rejected() {
    let store = Arc::new(FlakyStore::seeded().await);
    let (mut controller, _rx) = controller(store, "1");

    // Nothing loaded yet
    assert!(matches!(
        controller.save().await,
        Err(Error::InvalidTransition { .. })
    ));
    assert!(controller.set_title("early").is_err());

    controller.load().await.unwrap();
    assert!(controller.load().await.is_err());

    controller.save().await.unwrap();
    assert_eq!(controller.phase(), EditPhase::Done);

    // Done is terminal
    assert!(controller.save().await.is_err());
    assert!(controller.set_title("late").is_err());
}

#[tokio::test]
async fn test_edit_cannot_change_identity() {
    let store = Arc::new(FlakyStore::seeded().await);
    let (mut controller, _rx) = controller(store, "3");

    controller.load().await.unwrap();
    controller
        .edit(|draft| {
            draft.id = "4".to_string();
            draft.author_id = "2".to_string();
            draft.title = "Changed".to_string();
        })
        .unwrap();

    let draft = controller.working_copy().unwrap();
    assert_eq!(draft.id, "3");
    assert_eq!(draft.author_id, "1");
    assert_eq!(draft.title, "Changed");
}

#[tokio::test]
async fn test_save_survives_dropped_receiver() {
    let store = Arc::new(FlakyStore::seeded().await);
    let (mut controller, rx) = controller(store, "1");
    drop(rx);

    controller.load().await.unwrap();
    controller.save().await.unwrap();
    assert_eq!(controller.phase(), EditPhase::Done);
}

// ============================================================================
// HttpStore
// ============================================================================

fn http_store(server: &MockServer) -> HttpStore {
    let config = HttpClientConfig::new(&server.uri())
        .unwrap()
        .with_max_retries(0);
    HttpStore::new(HttpClient::new(config).unwrap())
}

fn article_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "type": "articles",
        "id": id,
        "attributes": {"title": title, "body": "Body"},
        "relationships": {"author": {"data": {"type": "authors", "id": "1"}}}
    })
}

#[tokio::test]
async fn test_http_store_find() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": article_json("1", "Dune")})),
        )
        .mount(&mock_server)
        .await;

    let store = http_store(&mock_server);
    let resource = store.find("articles", "1").await.unwrap();
    let article = Article::from_resource(resource).unwrap();

    assert_eq!(article.title, "Dune");
    assert_eq!(article.author_id, "1");
}

#[tokio::test]
async fn test_http_store_find_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "Not Found"}]
        })))
        .mount(&mock_server)
        .await;

    let store = http_store(&mock_server);
    let err = store.find("articles", "7").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref id, .. } if id == "7"));
}

#[tokio::test]
async fn test_http_store_query_forwards_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [article_json("3", "C"), article_json("4", "D")]
        })))
        .mount(&mock_server)
        .await;

    let store = http_store(&mock_server);
    let mut params = StringMap::new();
    params.insert("page[number]".to_string(), "2".to_string());

    let resources = store.query("articles", &params).await.unwrap();
    let ids: Vec<&str> = resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "4"]);
}

#[tokio::test]
async fn test_http_store_fetch_page_reads_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("page[number]", "1"))
        .and(query_param("page[size]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [article_json("1", "A"), article_json("2", "B")],
            "meta": {"page_number": 1, "page_size": 2, "total_pages": 3, "record_count": 5},
            "links": {"next": "/articles?page%5Bnumber%5D=2&page%5Bsize%5D=2"}
        })))
        .mount(&mock_server)
        .await;

    let store = http_store(&mock_server);
    let document = store
        .fetch_page("articles", &PageParams::paged(1, 2))
        .await
        .unwrap();

    assert_eq!(
        document.meta,
        Some(PageMeta::Paged {
            page_number: 1,
            page_size: 2,
            total_pages: 3,
            record_count: 5,
        })
    );
    assert!(document.links.contains_key("next"));
    assert_eq!(document.into_collection().unwrap().len(), 2);
}

#[tokio::test]
async fn test_http_store_save_patches_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/articles/1"))
        .and(body_json(json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": {"title": "New", "body": "Body"}
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": article_json("1", "New")})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = http_store(&mock_server);
    let patch = ResourceObject::new("articles", "1")
        .with_attribute("title", "New")
        .with_attribute("body", "Body");

    let saved = store.save(patch).await.unwrap();
    assert_eq!(saved.attributes["title"], "New");
}

#[tokio::test]
async fn test_controller_over_http_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": article_json("1", "Dune")})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/articles/1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "errors": [{"status": "409", "title": "Conflict"}]
        })))
        .mount(&mock_server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = EditController::new(Arc::new(http_store(&mock_server)), tx, "1");

    controller.load().await.unwrap();
    controller.set_title("Children of Dune").unwrap();
    let err = controller.save().await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 409, .. }));
    assert_eq!(controller.phase(), EditPhase::Failed);
    assert_eq!(controller.working_copy().unwrap().title, "Children of Dune");
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}
