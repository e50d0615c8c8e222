//! File-backed store backend.
//!
//! Persists every collection in a single JSON file. Commits apply the
//! batch in memory and rewrite the file atomically via a temp file, so a
//! crash mid-write never leaves a half-written store behind.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::store::memory::StoreData;
use crate::store::{Collection, Document, DocumentStore, StoreError, StoreResult, WriteBatch};

/// Document store persisted as one JSON file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonStore {
    /// Open a store at the given path, creating an empty one if the file
    /// does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let bytes = std::fs::read(&path)?;
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                message: format!("{}: {}", path.display(), e),
            })?
        } else {
            StoreData::default()
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, StoreData>> {
        self.data.lock().map_err(|e| StoreError::Internal {
            message: format!("Failed to acquire store lock: {}", e),
        })
    }

    fn persist(&self, data: &StoreData) -> StoreResult<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let bytes = serde_json::to_vec_pretty(data).map_err(|e| StoreError::Internal {
            message: format!("Failed to encode store data: {}", e),
        })?;

        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(&bytes)?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl DocumentStore for JsonStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self.lock()?.list(collection))
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut data = self.lock()?;
        data.apply(batch);
        self.persist(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(id: &str, name: &str) -> Document {
        let mut fields = serde_json::Map::new();
        fields.insert("name".to_string(), json!(name));
        Document::with_id(id, fields)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::open(temp_dir.path().join("store.json")).unwrap();

        let docs = store.list_all(Collection::Customers).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_commit_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        {
            let store = JsonStore::open(&path).unwrap();
            let mut batch = WriteBatch::new();
            batch.upsert(Collection::Workers, doc("w1", "Nazim"));
            batch.upsert(Collection::Currencies, doc("cur1", "TRY"));
            store.commit(batch).await.unwrap();
        }

        let reopened = JsonStore::open(&path).unwrap();
        let workers = reopened.list_all(Collection::Workers).await.unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].id.as_deref(), Some("w1"));

        let currencies = reopened.list_all(Collection::Currencies).await.unwrap();
        assert_eq!(currencies[0].fields["name"], json!("TRY"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = JsonStore::open(&path);
        assert!(matches!(result.unwrap_err(), StoreError::Corrupt { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_commit_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        let store = JsonStore::open(&path).unwrap();
        let mut batch = WriteBatch::new();
        batch.upsert(Collection::Checks, doc("k1", "rent"));
        store.commit(batch).await.unwrap();

        assert!(path.exists());
    }
}
