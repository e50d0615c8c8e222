//! In-memory store backend.
//!
//! Reference implementation of [`DocumentStore`] used in tests and as the
//! application model of the hosted store: every collection is an ordered
//! sequence of documents, and batches apply atomically under one lock.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::store::{
    Collection, Document, DocumentStore, StoreError, StoreResult, WriteBatch, WriteOp,
};

/// Generate a hex document identifier for records the caller left unnamed.
pub(crate) fn generate_document_id() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let stamp = (duration.as_secs() as u32) ^ duration.subsec_nanos();
    let nonce = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:08x}{:04x}", stamp, nonce & 0xffff)
}

/// Collection contents shared by the in-memory and file-backed backends.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct StoreData {
    #[serde(flatten)]
    collections: BTreeMap<Collection, Vec<Document>>,
}

impl StoreData {
    pub(crate) fn list(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Apply a batch in operation order. Upserts with a known identifier
    /// overwrite in place; unnamed documents get a fresh identifier.
    pub(crate) fn apply(&mut self, batch: WriteBatch) {
        for op in batch {
            match op {
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = self.collections.get_mut(&collection) {
                        docs.retain(|doc| doc.id.as_deref() != Some(id.as_str()));
                    }
                }
                WriteOp::Upsert {
                    collection,
                    mut document,
                } => {
                    let docs = self.collections.entry(collection).or_default();
                    match &document.id {
                        Some(id) => {
                            if let Some(existing) =
                                docs.iter_mut().find(|doc| doc.id.as_deref() == Some(id))
                            {
                                *existing = document;
                            } else {
                                docs.push(document);
                            }
                        }
                        None => {
                            document.id = Some(generate_document_id());
                            docs.push(document);
                        }
                    }
                }
            }
        }
    }
}

/// In-memory document store.
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(StoreData::default()),
        }
    }

    /// Build a store pre-populated with the given collections.
    pub fn from_collections(collections: BTreeMap<Collection, Vec<Document>>) -> Self {
        Self {
            data: Mutex::new(StoreData { collections }),
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, StoreData>> {
        self.data.lock().map_err(|e| StoreError::Internal {
            message: format!("Failed to acquire store lock: {}", e),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self.lock()?.list(collection))
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        self.lock()?.apply(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_commit_then_list() {
        let store = MemoryStore::new();

        let mut batch = WriteBatch::new();
        batch.upsert(
            Collection::Customers,
            Document::with_id("c1", fields(json!({"name": "Ada"}))),
        );
        batch.upsert(
            Collection::Customers,
            Document::with_id("c2", fields(json!({"name": "Grace"}))),
        );
        store.commit(batch).await.unwrap();

        let docs = store.list_all(Collection::Customers).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id.as_deref(), Some("c1"));
        assert_eq!(docs[1].fields["name"], json!("Grace"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unnamed_document_gets_an_id() {
        let store = MemoryStore::new();

        let mut batch = WriteBatch::new();
        batch.upsert(
            Collection::Products,
            Document::new(fields(json!({"name": "Flour"}))),
        );
        store.commit(batch).await.unwrap();

        let docs = store.list_all(Collection::Products).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].id.is_some());
        assert!(!docs[0].id.as_deref().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generated_ids_are_distinct() {
        let store = MemoryStore::new();

        let mut batch = WriteBatch::new();
        for i in 0..50 {
            batch.upsert(
                Collection::Sales,
                Document::new(fields(json!({"total": i}))),
            );
        }
        store.commit(batch).await.unwrap();

        let docs = store.list_all(Collection::Sales).await.unwrap();
        let mut ids: Vec<_> = docs.iter().map(|d| d.id.clone().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_then_upsert_same_id() {
        let store = MemoryStore::new();

        let mut seed = WriteBatch::new();
        seed.upsert(
            Collection::Vendors,
            Document::with_id("v1", fields(json!({"name": "Old"}))),
        );
        store.commit(seed).await.unwrap();

        // Delete and re-insert in the same batch: the upsert wins.
        let mut batch = WriteBatch::new();
        batch.delete(Collection::Vendors, "v1");
        batch.upsert(
            Collection::Vendors,
            Document::with_id("v1", fields(json!({"name": "New"}))),
        );
        store.commit(batch).await.unwrap();

        let docs = store.list_all(Collection::Vendors).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["name"], json!("New"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_overwrites_in_place() {
        let store = MemoryStore::new();

        let mut seed = WriteBatch::new();
        seed.upsert(
            Collection::Banks,
            Document::with_id("b1", fields(json!({"name": "First"}))),
        );
        seed.upsert(
            Collection::Banks,
            Document::with_id("b2", fields(json!({"name": "Second"}))),
        );
        store.commit(seed).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.upsert(
            Collection::Banks,
            Document::with_id("b1", fields(json!({"name": "Renamed"}))),
        );
        store.commit(batch).await.unwrap();

        let docs = store.list_all(Collection::Banks).await.unwrap();
        assert_eq!(docs.len(), 2);
        // Position preserved, contents replaced.
        assert_eq!(docs[0].id.as_deref(), Some("b1"));
        assert_eq!(docs[0].fields["name"], json!("Renamed"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        let docs = store.list_all(Collection::WorkerAttendance).await.unwrap();
        assert!(docs.is_empty());
    }
}
