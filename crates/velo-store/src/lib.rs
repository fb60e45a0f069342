//! Document-store abstraction for VeloCommerce.
//!
//! The catalog is backed by a schemaless document store that exposes
//! collection queries (filter/order/limit/cursor), point lookups, and an
//! optional server-side count aggregation. This crate defines that narrow
//! interface plus the query builder used to compose requests against it,
//! and ships an in-memory backend for local runs and tests.

pub mod document;
pub mod error;
pub mod memory;
pub mod query;
pub mod storage;

pub use document::Document;
pub use error::{ErrorCode, StoreError};
pub use memory::MemoryStore;
pub use query::{Direction, Op, Predicate, QueryBuilder, SortKey, StructuredQuery};
pub use storage::{MemoryObjectStorage, ObjectStorage};

use async_trait::async_trait;
use serde_json::Map;

/// The backing document store, reduced to the operations the catalog needs.
///
/// Implementations are expected to apply a [`StructuredQuery`] in the fixed
/// order `filters -> sorts -> cursor -> limit`; [`QueryBuilder::build`]
/// produces queries under that assumption.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Run a structured query against a collection.
    async fn run(
        &self,
        collection: &str,
        query: StructuredQuery,
    ) -> Result<Vec<Document>, StoreError>;

    /// Point lookup by document id. Absent documents are `Ok(None)`.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document; the store assigns and returns its id.
    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, serde_json::Value>,
    ) -> Result<String, StoreError>;

    /// Create or replace a document under a caller-chosen id.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, serde_json::Value>,
    ) -> Result<(), StoreError>;

    /// Replace the fields of an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, serde_json::Value>,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Server-side count of documents matching the predicates.
    ///
    /// Backends without a count aggregation return
    /// [`StoreError::AggregationUnsupported`]; callers fall back to running
    /// the filtered query and counting rows.
    async fn count(&self, collection: &str, predicates: &[Predicate]) -> Result<u64, StoreError>;
}
