use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;

/// Collection-scoped JSON document storage.
///
/// Every mutating call is a single atomic write on one document; no operation
/// spans more than one document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, id: Uuid, document: Value) -> Result<(), DatabaseError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, DatabaseError>;

    /// Documents whose top-level `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, DatabaseError>;

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, DatabaseError>;

    /// Newest first by an RFC 3339 timestamp field.
    async fn find_recent(
        &self,
        collection: &str,
        sort_field: &str,
        limit: usize,
    ) -> Result<Vec<Value>, DatabaseError>;

    /// Merge `fields` into the top level of the document. Returns false when no document matched.
    async fn set_fields(
        &self,
        collection: &str,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<bool, DatabaseError>;

    async fn increment(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
        by: i64,
    ) -> Result<bool, DatabaseError>;

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// In-process store used when no `DATABASE_URL` is configured and in tests
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<Uuid, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_timestamps(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let parse = |v: Option<&Value>| -> Option<DateTime<FixedOffset>> {
        v.and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    };
    parse(a).cmp(&parse(b))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, id: Uuid, document: Value) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(&id)).cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_recent(
        &self,
        collection: &str,
        sort_field: &str,
        limit: usize,
    ) -> Result<Vec<Value>, DatabaseError> {
        let mut docs = self.find_all(collection).await?;
        docs.sort_by(|a, b| compare_timestamps(b.get(sort_field), a.get(sort_field)));
        docs.truncate(limit);
        Ok(docs)
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(Value::Object(doc)) = collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) else {
            return Ok(false);
        };
        doc.extend(fields);
        Ok(true)
    }

    async fn increment(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
        by: i64,
    ) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(Value::Object(doc)) = collections.get_mut(collection).and_then(|docs| docs.get_mut(&id)) else {
            return Ok(false);
        };
        let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
        doc.insert(field.to_string(), Value::from(current + by));
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Memory store whose counter bumps and health check always time out
#[cfg(test)]
#[derive(Default)]
pub(crate) struct DegradedStore(MemoryDocumentStore);

#[cfg(test)]
impl DegradedStore {
    fn timeout(operation: &'static str) -> DatabaseError {
        DatabaseError::Timeout {
            collection: "jobs",
            operation,
            timeout: std::time::Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStore for DegradedStore {
    async fn insert(&self, collection: &str, id: Uuid, document: Value) -> Result<(), DatabaseError> {
        self.0.insert(collection, id, document).await
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        self.0.find_by_id(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, DatabaseError> {
        self.0.find_by_field(collection, field, value).await
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Value>, DatabaseError> {
        self.0.find_all(collection).await
    }

    async fn find_recent(
        &self,
        collection: &str,
        sort_field: &str,
        limit: usize,
    ) -> Result<Vec<Value>, DatabaseError> {
        self.0.find_recent(collection, sort_field, limit).await
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<bool, DatabaseError> {
        self.0.set_fields(collection, id, fields).await
    }

    async fn increment(&self, _: &str, _: Uuid, _: &str, _: i64) -> Result<bool, DatabaseError> {
        Err(Self::timeout("increment"))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, DatabaseError> {
        self.0.delete(collection, id).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(Self::timeout("ping"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_fields_merges_top_level_keys() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store
            .insert("jobs", id, json!({ "title": "A", "status": "Open" }))
            .await
            .unwrap();

        let mut fields = Map::new();
        fields.insert("status".into(), json!("Closed"));
        assert!(store.set_fields("jobs", id, fields).await.unwrap());

        let doc = store.find_by_id("jobs", id).await.unwrap().unwrap();
        assert_eq!(doc, json!({ "title": "A", "status": "Closed" }));
    }

    #[tokio::test]
    async fn set_fields_on_missing_document_reports_no_match() {
        let store = MemoryDocumentStore::new();
        let matched = store
            .set_fields("jobs", Uuid::new_v4(), Map::new())
            .await
            .unwrap();
        assert!(!matched);
    }

    #[tokio::test]
    async fn increment_starts_from_zero() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store.insert("jobs", id, json!({})).await.unwrap();
        store.increment("jobs", id, "applicants", 1).await.unwrap();
        store.increment("jobs", id, "applicants", 1).await.unwrap();

        let doc = store.find_by_id("jobs", id).await.unwrap().unwrap();
        assert_eq!(doc["applicants"], json!(2));
    }

    #[tokio::test]
    async fn find_recent_orders_newest_first() {
        let store = MemoryDocumentStore::new();
        for (title, ts) in [
            ("old", "2024-01-01T00:00:00Z"),
            ("new", "2024-03-01T00:00:00.5Z"),
            ("mid", "2024-02-01T00:00:00Z"),
        ] {
            store
                .insert("jobs", Uuid::new_v4(), json!({ "title": title, "createdAt": ts }))
                .await
                .unwrap();
        }

        let docs = store.find_recent("jobs", "createdAt", 2).await.unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn find_by_field_matches_exact_values() {
        let store = MemoryDocumentStore::new();
        let owner = Uuid::new_v4();
        store
            .insert("jobs", Uuid::new_v4(), json!({ "company": owner.to_string() }))
            .await
            .unwrap();
        store
            .insert("jobs", Uuid::new_v4(), json!({ "company": Uuid::new_v4().to_string() }))
            .await
            .unwrap();

        let docs = store
            .find_by_field("jobs", "company", &json!(owner.to_string()))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }
}
