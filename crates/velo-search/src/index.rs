//! The external search index interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A request to the external index.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub hits_per_page: usize,
    /// Zero-based page of hits.
    pub page: usize,
    /// Backend-specific filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    /// Facet names to aggregate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, hits_per_page: usize, page: usize) -> Self {
        Self {
            query: query.into(),
            hits_per_page,
            page,
            filters: None,
            facets: Vec::new(),
        }
    }
}

/// A highlighted span inside a hit field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub field: String,
    pub snippet: String,
}

/// One scored hit. The index's identity field is adapted into the
/// product id by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub object_id: String,
    pub score: f64,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// A page of hits from the external index.
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub total: usize,
}

/// The external full-text search service.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError>;
}
