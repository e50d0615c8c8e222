//! Document store abstraction layer.
//!
//! This module provides trait-based abstractions for the backing document
//! store, allowing different backends (in-memory, file-backed, hosted)
//! to be swapped without changing the backup logic.
//!
//! # Architecture
//!
//! - `error`: Backend-agnostic error types
//! - `document`: The generic document model and the collection registry
//! - `client`: Trait definition for store access plus the write batch

mod client;
mod document;
mod error;
mod json;
mod memory;


#[cfg(test)]
pub use client::MockDocumentStore;
pub use client::{DocumentStore, WriteBatch, WriteOp};
pub use document::{Collection, Document};
pub use error::{StoreError, StoreResult};
pub use json::JsonStore;
pub use memory::MemoryStore;
