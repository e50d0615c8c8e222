//! Export the in-memory collections to a backup file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::backup::snapshot::{Snapshot, backup_filename};
use crate::backup::surface::{FileSurface, SurfaceError};
use crate::state::AppState;
use crate::store::Collection;

/// Errors that can occur during export.
#[derive(Error, Diagnostic, Debug)]
pub enum ExportError {
    #[error("Failed to encode snapshot: {0}")]
    #[diagnostic(code(mbk::backup::export::encode))]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to save backup file: {0}")]
    #[diagnostic(code(mbk::backup::export::save))]
    Save(#[from] SurfaceError),
}

/// Summary of exported records, per collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    counts: BTreeMap<Collection, usize>,
}

impl ExportSummary {
    pub fn get(&self, collection: Collection) -> usize {
        self.counts.get(&collection).copied().unwrap_or(0)
    }

    /// Per-collection counts, in restore order.
    pub fn counts(&self) -> &BTreeMap<Collection, usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub path: PathBuf,
    pub summary: ExportSummary,
}

/// Export every collection to a timestamped backup file.
///
/// Serializes the current in-memory state (empty collections included) and
/// hands the bytes to the file surface. Never mutates the state and never
/// contacts the backing store; on failure no file is produced.
pub fn export_snapshot<F: FileSurface>(
    state: &AppState,
    files: &F,
) -> Result<ExportReceipt, ExportError> {
    export_snapshot_at(state, files, Utc::now())
}

/// Export with a fixed creation time.
pub fn export_snapshot_at<F: FileSurface>(
    state: &AppState,
    files: &F,
    created_at: DateTime<Utc>,
) -> Result<ExportReceipt, ExportError> {
    let timestamp = created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let snapshot = Snapshot::from_collections(timestamp, state.collections().clone());
    let bytes = snapshot.to_json()?;

    let filename = backup_filename(created_at);
    let path = files.save_file(&bytes, &filename)?;

    let mut summary = ExportSummary::default();
    for (collection, docs) in state.collections() {
        summary.counts.insert(*collection, docs.len());
    }

    info!(
        "Exported {} records to {}",
        summary.total(),
        path.display()
    );
    Ok(ExportReceipt {
        filename,
        path,
        summary,
    })
}
