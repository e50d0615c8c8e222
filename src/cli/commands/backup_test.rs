use serde_json::json;
use tempfile::TempDir;

use crate::cli::commands::backup;
use crate::store::{Collection, Document, DocumentStore, JsonStore, WriteBatch};

fn doc(id: &str, name: &str) -> Document {
    let mut fields = serde_json::Map::new();
    fields.insert("name".to_string(), json!(name));
    Document::with_id(id, fields)
}

async fn seed_store(path: &std::path::Path) {
    let store = JsonStore::open(path).unwrap();
    let mut batch = WriteBatch::new();
    batch.upsert(Collection::Customers, doc("c1", "Ada"));
    batch.upsert(Collection::Products, doc("p1", "Flour"));
    batch.upsert(Collection::Products, doc("p2", "Sugar"));
    store.commit(batch).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_writes_a_backup_file() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    let out_dir = temp_dir.path().join("backups");
    seed_store(&store_path).await;

    let output = backup::export(&store_path, Some(out_dir.clone()))
        .await
        .unwrap();

    assert!(output.contains("✓"));
    assert!(output.contains("3 records"));

    let saved: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(saved.len(), 1);
    let name = saved[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("supermarket-backup-"));
    assert!(name.ends_with(".json"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_replaces_store_contents() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    seed_store(&store_path).await;

    let backup_path = temp_dir.path().join("restore-me.json");
    std::fs::write(
        &backup_path,
        serde_json::to_vec(&json!({
            "timestamp": "2024-01-01T00:00:00.000Z",
            "products": [{"id": "p9", "name": "Salt"}]
        }))
        .unwrap(),
    )
    .unwrap();

    let output = backup::import(&store_path, &backup_path, true).await.unwrap();
    assert!(output.contains("✓"));
    assert!(output.contains("Backup restored"));

    let store = JsonStore::open(&store_path).unwrap();
    let products = store.list_all(Collection::Products).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_deref(), Some("p9"));
    // Customers were not in the file and survive.
    assert_eq!(store.list_all(Collection::Customers).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_with_invalid_file_reports_failure() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    seed_store(&store_path).await;

    let backup_path = temp_dir.path().join("broken.json");
    std::fs::write(&backup_path, "nope").unwrap();

    let output = backup::import(&store_path, &backup_path, true).await.unwrap();
    assert!(output.contains("✗"));
    assert!(output.contains("invalid backup file format"));

    // Store untouched.
    let store = JsonStore::open(&store_path).unwrap();
    assert_eq!(store.list_all(Collection::Products).await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_lists_counts() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    seed_store(&store_path).await;

    let output = backup::status(&store_path).await.unwrap();
    assert!(output.contains("customers"));
    assert!(output.contains("workerAttendance"));
    assert!(output.contains("Total"));
}
