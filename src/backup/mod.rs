//! Backup module - snapshot export and restore for bookkeeping data.
//!
//! This module provides functionality to export every collection to one
//! timestamped JSON file and to restore such a file by replacing each
//! collection it contains, one atomic batch per collection.

mod export;
mod import;
mod paths;
mod restore;
mod snapshot;
mod status;
mod surface;

pub use export::{ExportError, ExportReceipt, ExportSummary, export_snapshot, export_snapshot_at};
pub use import::{
    ImportError, ImportOutcome, ImportReport, ImportStage, ImportSummary, import_snapshot,
    run_import,
};
pub use paths::{get_backup_dir, get_data_dir, get_store_path};
pub use restore::restore_collection;
pub use snapshot::{FormatError, Snapshot, backup_filename};
pub use status::{OperationStatus, export_status, import_status};
#[cfg(test)]
pub use surface::{MockConfirmPrompt, MockFileSurface};
pub use surface::{
    AssumeYes, ConfirmPrompt, FileSurface, LocalFiles, PickedFile, SurfaceError, TerminalPrompt,
};
