//! Search error types.

use thiserror::Error;
use velo_catalog::CatalogError;

/// Errors that can occur while searching.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The product source failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The external search index failed.
    #[error("search index error: {0}")]
    Index(String),
}

impl SearchError {
    /// Cancelled work is expected and never surfaced to users.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Catalog(e) if e.is_cancelled())
    }
}
