//! Per-collection restore transactions.

use tracing::debug;

use crate::store::{Collection, Document, DocumentStore, StoreResult, WriteBatch};

/// Replace one collection's remote contents with the given records.
///
/// Reads the full existing collection, marks every existing record for
/// deletion and every incoming record for upsert (keeping its identifier
/// when present, store-assigned otherwise), and commits all marks as one
/// atomic batch. After success the collection holds exactly `incoming`.
///
/// Returns the number of records written.
pub async fn restore_collection<S: DocumentStore>(
    store: &S,
    collection: Collection,
    incoming: &[Document],
) -> StoreResult<usize> {
    let existing = store.list_all(collection).await?;

    let mut batch = WriteBatch::new();
    for doc in &existing {
        if let Some(id) = &doc.id {
            batch.delete(collection, id.clone());
        }
    }
    for doc in incoming {
        batch.upsert(collection, doc.clone());
    }

    debug!(
        "Restoring '{}': deleting {} records, writing {}",
        collection,
        existing.len(),
        incoming.len()
    );
    store.commit(batch).await?;
    Ok(incoming.len())
}
