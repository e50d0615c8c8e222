//! In-memory application state.
//!
//! Holds the working copy of every collection, mirroring the backing
//! store. The state object is explicit and passed by reference; features
//! mutate it through their own narrow operations, and only the import
//! pipeline's apply step replaces collections wholesale.

mod notifier;

pub use notifier::{RefreshNotifier, RefreshToken};

use std::collections::BTreeMap;

use crate::store::{Collection, Document, DocumentStore, StoreResult};

/// The thirteen in-memory collections plus the refresh signal.
pub struct AppState {
    collections: BTreeMap<Collection, Vec<Document>>,
    notifier: RefreshNotifier,
}

impl AppState {
    /// Create an empty state with every collection present.
    pub fn new() -> Self {
        let mut collections = BTreeMap::new();
        for collection in Collection::ALL {
            collections.insert(collection, Vec::new());
        }
        Self {
            collections,
            notifier: RefreshNotifier::new(),
        }
    }

    /// Populate a fresh state from the backing store.
    pub async fn load_from_store<S: DocumentStore>(store: &S) -> StoreResult<Self> {
        let mut state = Self::new();
        for collection in Collection::ALL {
            let docs = store.list_all(collection).await?;
            state.set(collection, docs);
        }
        Ok(state)
    }

    /// Current contents of one collection.
    pub fn get(&self, collection: Collection) -> &[Document] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the contents of one collection.
    pub fn set(&mut self, collection: Collection, docs: Vec<Document>) {
        self.collections.insert(collection, docs);
    }

    /// All collections, keyed in restore order.
    pub fn collections(&self) -> &BTreeMap<Collection, Vec<Document>> {
        &self.collections
    }

    /// The refresh signal dependents subscribe to.
    pub fn notifier(&self) -> &RefreshNotifier {
        &self.notifier
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, WriteBatch};
    use serde_json::json;

    fn doc(id: &str, name: &str) -> Document {
        let mut fields = serde_json::Map::new();
        fields.insert("name".to_string(), json!(name));
        Document::with_id(id, fields)
    }

    #[test]
    fn test_new_state_has_every_collection_empty() {
        let state = AppState::new();
        assert_eq!(state.collections().len(), Collection::ALL.len());
        for collection in Collection::ALL {
            assert!(state.get(collection).is_empty());
        }
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut state = AppState::new();
        state.set(Collection::Customers, vec![doc("c1", "Ada")]);
        state.set(Collection::Customers, vec![doc("c2", "Grace")]);

        let docs = state.get(Collection::Customers);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id.as_deref(), Some("c2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_load_from_store() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.upsert(Collection::Vendors, doc("v1", "Acme"));
        batch.upsert(Collection::Products, doc("p1", "Flour"));
        store.commit(batch).await.unwrap();

        let state = AppState::load_from_store(&store).await.unwrap();
        assert_eq!(state.get(Collection::Vendors).len(), 1);
        assert_eq!(state.get(Collection::Products).len(), 1);
        assert!(state.get(Collection::Sales).is_empty());
    }
}
