//! # Sale Errors
//!
//! Everything that can stop a checkout, a ledger append or an invoice write.

use std::path::PathBuf;
use thiserror::Error;

use rxdesk_core::{CoreError, ValidationError};
use rxdesk_db::DbError;

/// Errors from the sale workflow.
#[derive(Debug, Error)]
pub enum SaleError {
    /// Business rule failed (unknown medicine, insufficient stock, bad basket).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Record store failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Ledger or invoice file could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding failed while appending to the ledger.
    #[error("Ledger write failed: {0}")]
    Csv(#[from] csv::Error),
}

impl SaleError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SaleError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ValidationError> for SaleError {
    fn from(err: ValidationError) -> Self {
        SaleError::Core(CoreError::Validation(err))
    }
}

/// Result type for sale operations.
pub type SaleResult<T> = Result<T, SaleError>;
