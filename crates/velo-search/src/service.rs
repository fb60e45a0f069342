//! The search service.

use std::sync::Arc;

use velo_catalog::{Product, ProductId};
use velo_data::cancel::CancelToken;

use crate::error::SearchError;
use crate::fallback::FallbackIndex;
use crate::index::{SearchIndex, SearchRequest};
use crate::source::ProductSource;

/// Queries shorter than this return nothing without touching any backend.
pub const MIN_QUERY_CHARS: usize = 2;

/// Search over products: the external index when one is configured, the
/// in-memory fallback otherwise.
pub struct SearchService {
    index: Option<Arc<dyn SearchIndex>>,
    fallback: FallbackIndex,
}

impl SearchService {
    /// Fallback-only service.
    pub fn new() -> Self {
        Self {
            index: None,
            fallback: FallbackIndex::new(),
        }
    }

    /// Service delegating to an external index.
    pub fn with_index(index: Arc<dyn SearchIndex>) -> Self {
        Self {
            index: Some(index),
            fallback: FallbackIndex::new(),
        }
    }

    /// Replace the fallback (e.g. to shorten its TTL in tests).
    pub fn with_fallback(mut self, fallback: FallbackIndex) -> Self {
        self.fallback = fallback;
        self
    }

    /// Search products.
    ///
    /// Queries under two characters (after trimming) short-circuit to an
    /// empty result as a cost control, before any backend call.
    pub async fn search(
        &self,
        source: &dyn ProductSource,
        query: &str,
        limit: usize,
        offset: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, SearchError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        match &self.index {
            Some(index) => {
                let page = if limit > 0 { offset / limit } else { 0 };
                let response = index
                    .search(SearchRequest::new(trimmed, limit, page))
                    .await?;
                let mut products = Vec::with_capacity(response.hits.len());
                for hit in response.hits {
                    let id = ProductId::new(hit.object_id);
                    // The index can be ahead of the store; unresolvable
                    // hits are skipped, not errors.
                    if let Some(product) = source.product(&id, cancel).await? {
                        products.push(product);
                    }
                }
                Ok(products)
            }
            None => {
                self.fallback
                    .search(source, trimmed, limit, offset, cancel)
                    .await
            }
        }
    }

    /// Suggestion strings for a partial query. Always served by the
    /// fallback scorer; the external index seam has no suggestion API.
    pub async fn suggest(
        &self,
        source: &dyn ProductSource,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, SearchError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        self.fallback.suggest(source, trimmed, cancel).await
    }
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}
