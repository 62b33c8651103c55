use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::store::DocumentStore;

/// A persisted record type and the collection it lives in
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
    /// Singular name used in client-facing messages
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Typed access to one collection. Every call is bounded by `timeout`.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            timeout: self.timeout,
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            _phantom: PhantomData,
        }
    }

    async fn bounded<R>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<R, DatabaseError>>,
    ) -> Result<R, DatabaseError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DatabaseError::Timeout {
                collection: T::COLLECTION,
                operation,
                timeout: self.timeout,
            }),
        }
    }

    fn decode_all(docs: Vec<Value>) -> Result<Vec<T>, DatabaseError> {
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(DatabaseError::from))
            .collect()
    }

    pub async fn insert(&self, record: &T) -> Result<(), DatabaseError> {
        let document = serde_json::to_value(record)?;
        self.bounded("insert", self.store.insert(T::COLLECTION, record.id(), document))
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let doc = self
            .bounded("find_by_id", self.store.find_by_id(T::COLLECTION, id))
            .await?;
        doc.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn find_by(&self, field: &str, value: impl Serialize) -> Result<Vec<T>, DatabaseError> {
        let value = serde_json::to_value(value)?;
        let docs = self
            .bounded("find_by_field", self.store.find_by_field(T::COLLECTION, field, &value))
            .await?;
        Self::decode_all(docs)
    }

    pub async fn find_one_by(&self, field: &str, value: impl Serialize) -> Result<Option<T>, DatabaseError> {
        Ok(self.find_by(field, value).await?.into_iter().next())
    }

    pub async fn find_all(&self) -> Result<Vec<T>, DatabaseError> {
        let docs = self.bounded("find_all", self.store.find_all(T::COLLECTION)).await?;
        Self::decode_all(docs)
    }

    pub async fn find_recent(&self, sort_field: &str, limit: usize) -> Result<Vec<T>, DatabaseError> {
        let docs = self
            .bounded("find_recent", self.store.find_recent(T::COLLECTION, sort_field, limit))
            .await?;
        Self::decode_all(docs)
    }

    /// Single conditional write keyed on `id`; false when no document matched.
    pub async fn set_fields(&self, id: Uuid, fields: Map<String, Value>) -> Result<bool, DatabaseError> {
        self.bounded("set_fields", self.store.set_fields(T::COLLECTION, id, fields))
            .await
    }

    pub async fn increment(&self, id: Uuid, field: &str, by: i64) -> Result<bool, DatabaseError> {
        self.bounded("increment", self.store.increment(T::COLLECTION, id, field, by))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.bounded("delete", self.store.delete(T::COLLECTION, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MemoryDocumentStore;
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Note {
        id: Uuid,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
        const KIND: &'static str = "note";

        fn id(&self) -> Uuid {
            self.id
        }
    }

    /// Never answers, so every call runs into the deadline
    struct StalledStore;

    #[async_trait]
    impl DocumentStore for StalledStore {
        async fn insert(&self, _: &str, _: Uuid, _: Value) -> Result<(), DatabaseError> {
            std::future::pending().await
        }
        async fn find_by_id(&self, _: &str, _: Uuid) -> Result<Option<Value>, DatabaseError> {
            std::future::pending().await
        }
        async fn find_by_field(&self, _: &str, _: &str, _: &Value) -> Result<Vec<Value>, DatabaseError> {
            std::future::pending().await
        }
        async fn find_all(&self, _: &str) -> Result<Vec<Value>, DatabaseError> {
            std::future::pending().await
        }
        async fn find_recent(&self, _: &str, _: &str, _: usize) -> Result<Vec<Value>, DatabaseError> {
            std::future::pending().await
        }
        async fn set_fields(&self, _: &str, _: Uuid, _: Map<String, Value>) -> Result<bool, DatabaseError> {
            std::future::pending().await
        }
        async fn increment(&self, _: &str, _: Uuid, _: &str, _: i64) -> Result<bool, DatabaseError> {
            std::future::pending().await
        }
        async fn delete(&self, _: &str, _: Uuid) -> Result<bool, DatabaseError> {
            std::future::pending().await
        }
        async fn ping(&self) -> Result<(), DatabaseError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn stores_and_loads_typed_records() {
        let repo: Repository<Note> =
            Repository::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(1));
        let note = Note { id: Uuid::new_v4(), body: "hello".into() };
        repo.insert(&note).await.unwrap();

        assert_eq!(repo.find_by_id(note.id).await.unwrap(), Some(note));
        let by_body = repo.find_one_by("body", "hello").await.unwrap();
        assert!(by_body.is_some());
    }

    #[tokio::test]
    async fn slow_store_calls_fail_with_timeout() {
        let repo: Repository<Note> = Repository::new(Arc::new(StalledStore), Duration::from_millis(20));
        let err = repo.find_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Timeout { collection: "notes", operation: "find_by_id", .. }
        ));
    }
}
