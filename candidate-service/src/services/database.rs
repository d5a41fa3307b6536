use crate::services::store::{Document, DocumentStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document as BsonDocument},
    options::ReplaceOptions,
    Client as MongoClient, Collection, Database,
};
use serde_json::Value;
use service_core::error::AppError;

/// MongoDB-backed [`DocumentStore`]. Keys are stored as `_id`.
#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Drop the key and convert the remaining fields to plain JSON.
fn into_document(mut raw: BsonDocument) -> Document {
    raw.remove("_id");
    match Bson::Document(raw).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, AppError> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": key }, None)
            .await?;
        Ok(found.map(into_document))
    }

    async fn set(&self, collection: &str, key: &str, data: Document) -> Result<(), AppError> {
        let mut replacement = bson::to_document(&data)
            .map_err(|e| AppError::DatabaseError(anyhow::Error::new(e)))?;
        replacement.insert("_id", key);

        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection(collection)
            .replace_one(doc! { "_id": key }, replacement, options)
            .await?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        let mut cursor = self.collection(collection).find(None, None).await?;

        let mut documents = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            documents.push(into_document(raw));
        }
        Ok(documents)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
