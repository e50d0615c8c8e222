//! Store access trait and the atomic write batch.
//!
//! The trait defines the contract for store access, allowing different
//! backends to be swapped without changing the backup logic. Writes go
//! through a [`WriteBatch`]: delete and upsert marks accumulated locally
//! and committed in one all-or-nothing call.

use crate::store::{Collection, Document, StoreResult};

#[cfg(test)]
use mockall::automock;

/// A single pending write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Remove the document with this identifier from the collection.
    Delete { collection: Collection, id: String },
    /// Insert or overwrite a document. An absent identifier asks the store
    /// to assign one.
    Upsert {
        collection: Collection,
        document: Document,
    },
}

impl WriteOp {
    /// The collection this operation targets.
    pub fn collection(&self) -> Collection {
        match self {
            WriteOp::Delete { collection, .. } => *collection,
            WriteOp::Upsert { collection, .. } => *collection,
        }
    }
}

/// An ordered set of writes committed atomically.
///
/// Operations apply in insertion order, so a delete followed by an upsert
/// of the same identifier leaves the upserted document in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a document for deletion.
    pub fn delete(&mut self, collection: Collection, id: impl Into<String>) {
        self.ops.push(WriteOp::Delete {
            collection,
            id: id.into(),
        });
    }

    /// Mark a document for insertion or overwrite.
    pub fn upsert(&mut self, collection: Collection, document: Document) {
        self.ops.push(WriteOp::Upsert {
            collection,
            document,
        });
    }

    /// The pending operations, in application order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Trait for document store access. Can be mocked in tests.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, automock)]
pub trait DocumentStore: Send + Sync {
    /// Read the full contents of a collection. Every returned document
    /// carries an identifier.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Apply a batch of writes atomically. Either every operation takes
    /// effect or none does.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}
