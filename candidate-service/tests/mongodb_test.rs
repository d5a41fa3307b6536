use candidate_service::services::{DocumentStore, MongoStore};
use serde_json::{json, Value};

const MONGODB_URI: &str = "mongodb://localhost:27017";

fn unique_collection() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("candidates_test_{}", nanos)
}

#[tokio::test]
#[ignore = "Requires MongoDB at localhost:27017"]
async fn mongo_store_upserts_and_lists() {
    let store = MongoStore::connect(MONGODB_URI, "candidate_test")
        .await
        .expect("Failed to connect to MongoDB");
    let collection = unique_collection();

    assert!(store.list(&collection).await.unwrap().is_empty());
    assert!(store.get(&collection, "alice").await.unwrap().is_none());

    let data = json!({ "CandidateName": "alice" });
    let Value::Object(document) = data.clone() else {
        unreachable!()
    };
    store.set(&collection, "alice", document.clone()).await.unwrap();
    store.set(&collection, "alice", document).await.unwrap();

    let stored = store.get(&collection, "alice").await.unwrap().unwrap();
    assert_eq!(Value::Object(stored), data);
    assert_eq!(store.list(&collection).await.unwrap().len(), 1);

    store.health_check().await.unwrap();

    let _ = store.database().collection::<mongodb::bson::Document>(&collection).drop(None).await;
}
