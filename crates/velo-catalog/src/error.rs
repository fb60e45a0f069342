//! Catalog error types.

use thiserror::Error;
use velo_data::retry::RetryError;
use velo_store::StoreError;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document store failed with a non-retryable error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The attempt budget was spent on transient failures.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted { attempts: u32, source: StoreError },

    /// The operation was cancelled by its caller.
    #[error("operation cancelled")]
    Cancelled,

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The submitted record violates the product schema.
    #[error("validation error on {field}: {message}")]
    Validation { field: &'static str, message: String },
}

impl CatalogError {
    /// Whether the error came from a cancellation; cancelled work is
    /// expected and never surfaced to users.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }
}

impl From<RetryError<StoreError>> for CatalogError {
    fn from(e: RetryError<StoreError>) -> Self {
        match e {
            RetryError::Cancelled => CatalogError::Cancelled,
            RetryError::Exhausted { attempts, source } => {
                CatalogError::RetriesExhausted { attempts, source }
            }
            RetryError::Fatal(source) => CatalogError::Store(source),
        }
    }
}

impl From<crate::product::FieldError> for CatalogError {
    fn from(e: crate::product::FieldError) -> Self {
        CatalogError::Validation {
            field: e.field,
            message: e.message,
        }
    }
}
