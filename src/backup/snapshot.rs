//! Snapshot model and JSON encoding.
//!
//! A snapshot is the unit of backup and restore: a creation timestamp plus
//! whichever collections the file carries. Collections absent from a file
//! are left untouched on restore, so partial backups stay valid.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::{Collection, Document};

/// Errors raised while decoding a backup file.
#[derive(Error, Diagnostic, Debug)]
pub enum FormatError {
    #[error("file is not valid UTF-8 text")]
    #[diagnostic(code(mbk::backup::format::encoding))]
    InvalidEncoding,

    #[error("file is not valid JSON: {0}")]
    #[diagnostic(code(mbk::backup::format::json))]
    InvalidJson(#[source] serde_json::Error),

    #[error("file does not contain a top-level JSON object")]
    #[diagnostic(code(mbk::backup::format::shape))]
    NotAnObject,

    #[error("file is missing the 'timestamp' field")]
    #[diagnostic(code(mbk::backup::format::timestamp))]
    MissingTimestamp,

    #[error("collection '{collection}' is not an array of records: {message}")]
    #[diagnostic(code(mbk::backup::format::collection))]
    InvalidCollection {
        collection: Collection,
        message: String,
    },
}

/// A timestamped bundle of collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestamp: String,
    #[serde(flatten)]
    collections: BTreeMap<Collection, Vec<Document>>,
}

impl Snapshot {
    /// Create an empty snapshot with the given creation timestamp.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Create a snapshot carrying the given collections.
    pub fn from_collections(
        timestamp: impl Into<String>,
        collections: BTreeMap<Collection, Vec<Document>>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            collections,
        }
    }

    /// Add or replace one collection's records.
    pub fn insert(&mut self, collection: Collection, docs: Vec<Document>) {
        self.collections.insert(collection, docs);
    }

    /// Records for a collection, if the snapshot carries it.
    pub fn get(&self, collection: Collection) -> Option<&[Document]> {
        self.collections.get(&collection).map(Vec::as_slice)
    }

    /// Whether the snapshot carries this collection (possibly empty).
    pub fn contains(&self, collection: Collection) -> bool {
        self.collections.contains_key(&collection)
    }

    /// Collections carried by the snapshot, in restore order.
    pub fn present(&self) -> impl Iterator<Item = Collection> + '_ {
        Collection::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Encode as pretty-printed UTF-8 JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Decode a backup file.
    ///
    /// Shape rules: top level must be an object with a string `timestamp`;
    /// each recognized collection key must hold an array of records.
    /// Unrecognized top-level keys are ignored so newer backups still
    /// restore the sections this build knows about.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let text = std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidEncoding)?;
        let value: Value = serde_json::from_str(text).map_err(FormatError::InvalidJson)?;

        let Value::Object(map) = value else {
            return Err(FormatError::NotAnObject);
        };

        let timestamp = match map.get("timestamp") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(FormatError::MissingTimestamp),
        };

        let mut snapshot = Snapshot::new(timestamp);
        for collection in Collection::ALL {
            if let Some(raw) = map.get(collection.as_str()) {
                let docs: Vec<Document> = serde_json::from_value(raw.clone()).map_err(|e| {
                    FormatError::InvalidCollection {
                        collection,
                        message: e.to_string(),
                    }
                })?;
                snapshot.insert(collection, docs);
            }
        }
        Ok(snapshot)
    }
}

/// Backup filename for the given creation time.
///
/// The stamp is truncated to whole seconds with `:` replaced by `-`, then
/// run through a filename sanitizer.
pub fn backup_filename(created_at: DateTime<Utc>) -> String {
    let stamp = created_at.format("%Y-%m-%dT%H-%M-%S");
    sanitize_filename::sanitize(format!("supermarket-backup-{}.json", stamp))
}
