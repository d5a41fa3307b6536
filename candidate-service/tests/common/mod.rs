#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use candidate_service::services::{
    Document, DocumentStore, HostIdentity, InMemoryStore, StaticHostIdentity,
};
use candidate_service::startup::{build_router, AppState};
use service_core::error::AppError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_HOST: &str = "10.1.2.3";

/// In-memory store that counts every call made to it.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    calls: AtomicUsize,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, AppError> {
        self.record();
        self.inner.get(collection, key).await
    }

    async fn set(&self, collection: &str, key: &str, data: Document) -> Result<(), AppError> {
        self.record();
        self.inner.set(collection, key, data).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        self.record();
        self.inner.list(collection).await
    }
}

/// Store whose every operation fails as an unreachable database would.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _collection: &str, _key: &str) -> Result<Option<Document>, AppError> {
        Err(unavailable())
    }

    async fn set(&self, _collection: &str, _key: &str, _data: Document) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn list(&self, _collection: &str) -> Result<Vec<Document>, AppError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("store unavailable"))
}

pub struct FailingHost;

#[async_trait]
impl HostIdentity for FailingHost {
    async fn identity(&self) -> Result<String, AppError> {
        Err(AppError::InternalError(anyhow::anyhow!(
            "unable to determine host identity"
        )))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<RecordingStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(RecordingStore::default());
        let state = AppState::new(
            store.clone(),
            Arc::new(StaticHostIdentity::new(TEST_HOST)),
            "candidates",
        );
        Self {
            router: build_router(state),
            store,
        }
    }

    pub fn with(store: Arc<dyn DocumentStore>, host: Arc<dyn HostIdentity>) -> Router {
        build_router(AppState::new(store, host, "candidates"))
    }

    pub async fn call(&self, method: Method, uri: &str) -> TestResponse {
        send(&self.router, method, uri).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

pub async fn send(router: &Router, method: Method, uri: &str) -> TestResponse {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}
