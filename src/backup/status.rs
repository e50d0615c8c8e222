//! User-facing operation statuses.
//!
//! Every export and import exit is folded into one `{ success, message }`
//! value at this boundary; the surrounding shell only ever renders a
//! status, never an unhandled fault.

use serde::Serialize;

use crate::backup::export::{ExportError, ExportReceipt};
use crate::backup::import::{ImportError, ImportOutcome};
use crate::store::Collection;

/// Outcome of one backup operation, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

impl OperationStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn name_list(collections: &[Collection]) -> String {
    if collections.is_empty() {
        return "none".to_string();
    }
    collections
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fold an export result into a status.
pub fn export_status(result: &Result<ExportReceipt, ExportError>) -> OperationStatus {
    match result {
        Ok(receipt) => OperationStatus::ok(format!(
            "Backup saved as {} ({} records)",
            receipt.filename,
            receipt.summary.total()
        )),
        Err(e) => OperationStatus::failed(format!("Export failed: {}", e)),
    }
}

/// Fold an import result into a status.
///
/// A partial failure is spelled out: which collection failed, which were
/// already replaced, and which were never attempted.
pub fn import_status(result: &Result<ImportOutcome, ImportError>) -> OperationStatus {
    match result {
        Ok(outcome) => OperationStatus::ok(format!(
            "Backup restored: {} records across {} collections",
            outcome.summary.total(),
            outcome.summary.counts().len()
        )),
        Err(ImportError::Cancelled) => {
            OperationStatus::ok("Import cancelled; no changes were made")
        }
        Err(e @ ImportError::Format(_)) => OperationStatus::failed(e.to_string()),
        Err(ImportError::Restore {
            collection,
            replaced,
            not_attempted,
            source,
        }) => OperationStatus::failed(format!(
            "Restore failed at '{}': {}. Already replaced: {}. Not attempted: {}. \
             Replaced collections keep the backup's contents; the rest keep their previous contents.",
            collection,
            source,
            name_list(replaced),
            name_list(not_attempted)
        )),
    }
}
