//! Document store error types.
//!
//! Abstracted error types for store operations. Uses miette for fancy
//! diagnostic output and thiserror for derive macros. The error types are
//! backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Store operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Transport failure: {message}")]
    #[diagnostic(code(mbk::store::transport))]
    Transport { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(code(mbk::store::permission))]
    PermissionDenied { message: String },

    #[error("Storage quota exceeded: {message}")]
    #[diagnostic(code(mbk::store::quota))]
    QuotaExceeded { message: String },

    #[error("Store data corrupt: {message}")]
    #[diagnostic(code(mbk::store::corrupt))]
    Corrupt { message: String },

    #[error("Store error: {message}")]
    #[diagnostic(code(mbk::store::internal))]
    Internal { message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(mbk::store::io))]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
