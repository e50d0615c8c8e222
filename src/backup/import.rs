//! Import a backup file into the store and the in-memory state.
//!
//! The import is a staged pipeline: read → parse → confirm → restore each
//! carried collection sequentially → overwrite the in-memory state →
//! broadcast a refresh token. Parsing happens in full before any store
//! contact, so the only mid-run failures are store failures. Collections
//! already committed before such a failure stay replaced; there is no
//! cross-collection rollback, and the error says exactly which collections
//! were touched.

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backup::restore::restore_collection;
use crate::backup::snapshot::{FormatError, Snapshot};
use crate::backup::status::OperationStatus;
use crate::backup::surface::{ConfirmPrompt, PickedFile};
use crate::state::{AppState, RefreshToken};
use crate::store::{Collection, DocumentStore, StoreError};

/// Stages of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    FileSelected,
    Parsing,
    AwaitingConfirmation,
    Restoring,
    Applying,
    Done,
    Failed,
    Cancelled,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStage::Idle => "idle",
            ImportStage::FileSelected => "file selected",
            ImportStage::Parsing => "parsing",
            ImportStage::AwaitingConfirmation => "awaiting confirmation",
            ImportStage::Restoring => "restoring",
            ImportStage::Applying => "applying",
            ImportStage::Done => "done",
            ImportStage::Failed => "failed",
            ImportStage::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Errors that can end an import run.
#[derive(Error, Diagnostic, Debug)]
pub enum ImportError {
    #[error("invalid backup file format: {0}")]
    #[diagnostic(code(mbk::backup::import::format))]
    Format(#[from] FormatError),

    #[error("restore failed for collection '{collection}': {source}")]
    #[diagnostic(code(mbk::backup::import::restore))]
    Restore {
        /// The collection whose transaction failed.
        collection: Collection,
        /// Collections already replaced before the failure.
        replaced: Vec<Collection>,
        /// Collections the run never reached.
        not_attempted: Vec<Collection>,
        #[source]
        source: StoreError,
    },

    #[error("import cancelled by operator")]
    #[diagnostic(code(mbk::backup::import::cancelled))]
    Cancelled,
}

/// Per-collection record counts for a completed import.
///
/// Carries an entry for every collection the snapshot contained, including
/// collections that were present but empty (count 0).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    counts: BTreeMap<Collection, usize>,
}

impl ImportSummary {
    pub fn get(&self, collection: Collection) -> Option<usize> {
        self.counts.get(&collection).copied()
    }

    /// Per-collection counts, in restore order.
    pub fn counts(&self) -> &BTreeMap<Collection, usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    fn record(&mut self, collection: Collection, count: usize) {
        self.counts.insert(collection, count);
    }
}

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub summary: ImportSummary,
    /// Token broadcast to dependents after the state overwrite.
    pub refresh: RefreshToken,
}

/// User-facing result of an import, with every error folded into a status.
#[derive(Debug)]
pub struct ImportReport {
    pub stage: ImportStage,
    pub status: OperationStatus,
    pub outcome: Option<ImportOutcome>,
}

/// Run the import pipeline against a picked backup file.
///
/// The file is consumed whatever happens; retrying requires picking it
/// again. Cancellation is only possible at the confirmation gate; once the
/// first collection transaction starts the run cannot be stopped.
pub async fn run_import<S: DocumentStore, P: ConfirmPrompt>(
    store: &S,
    state: &mut AppState,
    prompt: &P,
    file: PickedFile,
) -> Result<ImportOutcome, ImportError> {
    let PickedFile { name, bytes } = file;

    debug!("Import stage '{}': {}", ImportStage::Parsing, name);
    let snapshot = Snapshot::parse(&bytes)?;

    debug!("Import stage '{}'", ImportStage::AwaitingConfirmation);
    let message = format!(
        "Restoring \"{}\" will permanently replace every collection it contains. \
         Records currently in those collections will be deleted. Continue?",
        name
    );
    if !prompt.confirm(&message).await {
        info!("Import of {} cancelled at confirmation", name);
        return Err(ImportError::Cancelled);
    }

    debug!("Import stage '{}'", ImportStage::Restoring);
    let mut summary = ImportSummary::default();
    let mut replaced: Vec<Collection> = Vec::new();

    for collection in Collection::ALL {
        let Some(docs) = snapshot.get(collection) else {
            continue;
        };
        if docs.is_empty() {
            summary.record(collection, 0);
            continue;
        }

        match restore_collection(store, collection, docs).await {
            Ok(written) => {
                info!("Restored {} records into '{}'", written, collection);
                summary.record(collection, written);
                replaced.push(collection);
            }
            Err(source) => {
                let not_attempted: Vec<Collection> = Collection::ALL
                    .into_iter()
                    .filter(|c| *c > collection)
                    .filter(|c| snapshot.get(*c).is_some_and(|d| !d.is_empty()))
                    .collect();
                warn!(
                    "Import failed at '{}' after {} collections: {}",
                    collection,
                    replaced.len(),
                    source
                );
                return Err(ImportError::Restore {
                    collection,
                    replaced,
                    not_attempted,
                    source,
                });
            }
        }
    }

    debug!("Import stage '{}'", ImportStage::Applying);
    for &collection in &replaced {
        if let Some(docs) = snapshot.get(collection) {
            state.set(collection, docs.to_vec());
        }
    }
    let refresh = RefreshToken::next();
    state.notifier().notify(refresh);

    info!(
        "Import of {} complete: {} records across {} collections",
        name,
        summary.total(),
        summary.counts().len()
    );
    Ok(ImportOutcome { summary, refresh })
}

/// Run an import and fold the result into a user-facing report.
///
/// Nothing propagates out of this call as an error; every exit becomes an
/// [`OperationStatus`].
pub async fn import_snapshot<S: DocumentStore, P: ConfirmPrompt>(
    store: &S,
    state: &mut AppState,
    prompt: &P,
    file: PickedFile,
) -> ImportReport {
    let result = run_import(store, state, prompt, file).await;
    let status = crate::backup::status::import_status(&result);
    match result {
        Ok(outcome) => ImportReport {
            stage: ImportStage::Done,
            status,
            outcome: Some(outcome),
        },
        Err(ImportError::Cancelled) => ImportReport {
            stage: ImportStage::Cancelled,
            status,
            outcome: None,
        },
        Err(_) => ImportReport {
            stage: ImportStage::Failed,
            status,
            outcome: None,
        },
    }
}
