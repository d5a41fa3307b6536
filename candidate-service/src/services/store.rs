//! Document-store abstraction.
//!
//! Handlers only see [`DocumentStore`]; the backend is picked once at startup
//! and shared through `AppState`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// A stored document: a JSON object without its key.
pub type Document = Map<String, Value>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document stored under `key`, if any.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, AppError>;

    /// Create or overwrite the document stored under `key`.
    async fn set(&self, collection: &str, key: &str, data: Document) -> Result<(), AppError>;

    /// Every document in `collection`, in whatever order the backend yields.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, AppError>;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Process-local store used for tests and local runs.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn set(&self, collection: &str, key: &str, data: Document) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get("candidates", "alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_key() {
        let store = InMemoryStore::new();
        store
            .set("candidates", "alice", doc(json!({ "CandidateName": "alice", "v": 1 })))
            .await
            .unwrap();
        store
            .set("candidates", "alice", doc(json!({ "CandidateName": "alice" })))
            .await
            .unwrap();

        let stored = store.get("candidates", "alice").await.unwrap().unwrap();
        assert_eq!(Value::Object(stored), json!({ "CandidateName": "alice" }));
        assert_eq!(store.list("candidates").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryStore::new();
        store
            .set("candidates", "alice", doc(json!({ "CandidateName": "alice" })))
            .await
            .unwrap();

        assert!(store.list("other").await.unwrap().is_empty());
        assert!(store.get("other", "alice").await.unwrap().is_none());
    }
}
