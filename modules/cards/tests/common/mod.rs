#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use mongodb::bson::{Bson, Document};
use serde_json::Value;

use cards::domain::service::CardService;
use cards::domain::store::{DocumentStore, StoreError, WriteOutcome};
use cards::infra::storage::MemoryStore;
use cards::model::CardFields;
use cards::{CardsConfig, CardsModule};

pub fn fields(value: Value) -> CardFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn memory_service() -> CardService {
    CardService::new(Arc::new(MemoryStore::new()))
}

pub fn unique_memory_service() -> CardService {
    CardService::new(Arc::new(
        MemoryStore::new().with_unique_index(&["suit", "rank"]),
    ))
}

/// Card routes over a fresh in-memory store, behind the real ingress stack.
pub fn test_app(unique_cards: bool) -> Router {
    let config = CardsConfig {
        unique_cards,
        ..CardsConfig::default()
    };
    let store: Arc<dyn DocumentStore> = if unique_cards {
        Arc::new(MemoryStore::new().with_unique_index(&["suit", "rank"]))
    } else {
        Arc::new(MemoryStore::new())
    };
    let module = CardsModule::with_store(store, config);
    let routes = module.register_rest(Router::new());
    api_ingress::ApiIngress::default().build_router(routes)
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Store whose every call fails with the given error.
pub struct FailingStore(pub StoreError);

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _doc: Document) -> Result<Bson, StoreError> {
        Err(self.0.clone())
    }

    async fn find(&self, _filter: Document) -> Result<Vec<Document>, StoreError> {
        Err(self.0.clone())
    }

    async fn find_one(&self, _filter: Document) -> Result<Option<Document>, StoreError> {
        Err(self.0.clone())
    }

    async fn replace(&self, _filter: Document, _doc: Document) -> Result<WriteOutcome, StoreError> {
        Err(self.0.clone())
    }

    async fn update_fields(
        &self,
        _filter: Document,
        _fields: Document,
    ) -> Result<WriteOutcome, StoreError> {
        Err(self.0.clone())
    }

    async fn delete_one(&self, _filter: Document) -> Result<u64, StoreError> {
        Err(self.0.clone())
    }

    async fn delete_many(&self, _filter: Document) -> Result<u64, StoreError> {
        Err(self.0.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.0.clone())
    }
}
