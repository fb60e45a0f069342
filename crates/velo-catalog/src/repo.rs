//! Product repository over the document store.
//!
//! All reads run under the retry policy; result rows are decoded against
//! the product schema and invalid rows dropped. Stale pagination cursors
//! degrade to un-cursored fetches, and a backend without count aggregation
//! degrades to fetch-and-count. Neither degradation surfaces as an error.

use std::sync::Arc;

use serde_json::json;
use velo_data::cancel::CancelToken;
use velo_data::retry::{retry, RetryError, RetryPolicy};
use velo_store::{
    CollectionStore, Direction, Document, Op, QueryBuilder, StoreError, StructuredQuery,
};

use crate::decode::{decode_all, decode_document, Decoded};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::listing::{percent_decode, PageMode, ProductFilters};
use crate::product::Product;

/// Collection holding product documents.
pub const PRODUCT_COLLECTION: &str = "products";

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Whether at least one more row exists past this page.
    pub has_more: bool,
    /// Cursor for the next sequential page.
    pub last_product_id: Option<ProductId>,
}

/// Domain-level product queries.
pub struct ProductRepository<S: CollectionStore + ?Sized> {
    store: Arc<S>,
    retry: RetryPolicy,
}

impl<S: CollectionStore + ?Sized> Clone for ProductRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            retry: self.retry.clone(),
        }
    }
}

impl<S: CollectionStore + ?Sized> ProductRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) async fn run_with_retry(
        &self,
        query: &StructuredQuery,
        cancel: &CancelToken,
    ) -> Result<Vec<Document>, CatalogError> {
        let docs = retry(&self.retry, cancel, StoreError::is_transient, || {
            self.store.run(PRODUCT_COLLECTION, query.clone())
        })
        .await?;
        Ok(docs)
    }

    async fn get_with_retry(
        &self,
        id: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Document>, CatalogError> {
        let doc = retry(&self.retry, cancel, StoreError::is_transient, || {
            self.store.get(PRODUCT_COLLECTION, id)
        })
        .await?;
        Ok(doc)
    }

    /// Resolve a cursor id to its concrete row.
    ///
    /// A cursor that no longer resolves (deleted or unknown) degrades the
    /// request to an un-cursored fetch instead of failing it; only
    /// cancellation propagates.
    async fn resolve_cursor(
        &self,
        cursor_id: &ProductId,
        cancel: &CancelToken,
    ) -> Result<Option<Document>, CatalogError> {
        match self.get_with_retry(cursor_id.as_str(), cancel).await {
            Ok(Some(doc)) => Ok(Some(doc)),
            Ok(None) => {
                tracing::debug!(cursor = %cursor_id, "cursor no longer resolves, fetching without it");
                Ok(None)
            }
            Err(CatalogError::Cancelled) => Err(CatalogError::Cancelled),
            Err(e) => {
                tracing::warn!(cursor = %cursor_id, error = %e, "cursor resolution failed, fetching without it");
                Ok(None)
            }
        }
    }

    async fn fetch_with_cursor(
        &self,
        mut builder: QueryBuilder,
        cursor_id: Option<&ProductId>,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, CatalogError> {
        if let Some(cursor_id) = cursor_id {
            if let Some(doc) = self.resolve_cursor(cursor_id, cancel).await? {
                builder = builder.start_after(doc);
            }
        }
        let docs = self.run_with_retry(&builder.build(), cancel).await?;
        Ok(decode_all(&docs))
    }

    /// Fetch products matching a filter set, honoring its sort, page size,
    /// and cursor.
    pub async fn fetch_filtered(
        &self,
        filters: &ProductFilters,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, CatalogError> {
        self.fetch_with_cursor(filters.query(), filters.cursor_id.as_ref(), cancel)
            .await
    }

    /// Fetch products within a category/subcategory pair.
    ///
    /// Both names are percent-decoded first; they typically arrive from
    /// URL path segments.
    pub async fn fetch_by_category(
        &self,
        category: &str,
        sub_category: &str,
        options: &ProductFilters,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut filters = options.clone();
        filters.categories = vec![percent_decode(category)];
        filters.sub_categories = vec![percent_decode(sub_category)];
        self.fetch_with_cursor(filters.query(), filters.cursor_id.as_ref(), cancel)
            .await
    }

    /// Point lookup. A stored row that fails validation is logged and
    /// treated as not found rather than surfaced as corrupt data.
    pub async fn fetch_by_id(
        &self,
        id: &ProductId,
        cancel: &CancelToken,
    ) -> Result<Option<Product>, CatalogError> {
        let Some(doc) = self.get_with_retry(id.as_str(), cancel).await? else {
            return Ok(None);
        };
        match decode_document(&doc) {
            Decoded::Valid(product) => Ok(Some(product)),
            Decoded::Invalid { id, reason } => {
                tracing::warn!(%id, %reason, "stored product failed validation, treating as not found");
                Ok(None)
            }
        }
    }

    /// Products flagged as recommended, best rated first.
    pub async fn fetch_recommended(
        &self,
        cancel: &CancelToken,
    ) -> Result<Vec<Product>, CatalogError> {
        let query = QueryBuilder::new()
            .filter("isRecommended", Op::Eq, json!(true))
            .order_by("rating", Direction::Desc)
            .build();
        let docs = self.run_with_retry(&query, cancel).await?;
        Ok(decode_all(&docs))
    }

    /// Count products matching a filter set.
    ///
    /// Tries the server-side aggregation with the same predicates (sort,
    /// cursor, and limit are irrelevant to counting). A backend without
    /// aggregation support falls back to running the filtered query
    /// unbounded and counting rows — a degraded-performance path, not a
    /// correctness compromise.
    pub async fn count(
        &self,
        filters: &ProductFilters,
        cancel: &CancelToken,
    ) -> Result<u64, CatalogError> {
        let query = filters.query_with_limit(0).build();
        let result = retry(&self.retry, cancel, StoreError::is_transient, || {
            self.store.count(PRODUCT_COLLECTION, &query.predicates)
        })
        .await;

        match result {
            Ok(count) => Ok(count),
            Err(RetryError::Fatal(StoreError::AggregationUnsupported)) => {
                tracing::debug!("count aggregation unsupported, counting fetched rows");
                let unbounded = StructuredQuery {
                    predicates: query.predicates,
                    ..Default::default()
                };
                let docs = self.run_with_retry(&unbounded, cancel).await?;
                Ok(docs.len() as u64)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one listing page in the requested pagination mode.
    ///
    /// One extra row is fetched as the has-more probe. Offset mode fetches
    /// the whole prefix and drops it client-side; the store has no offset
    /// primitive, so arbitrary jumps pay for the rows they skip.
    pub async fn fetch_page(
        &self,
        filters: &ProductFilters,
        mode: &PageMode,
        cancel: &CancelToken,
    ) -> Result<ProductPage, CatalogError> {
        let page_size = filters.page_size;
        let probe = page_size + 1;

        let docs = match mode {
            PageMode::Cursor { last_id } => {
                let mut builder = filters.query_with_limit(probe as i64);
                if let Some(doc) = self.resolve_cursor(last_id, cancel).await? {
                    builder = builder.start_after(doc);
                }
                self.run_with_retry(&builder.build(), cancel).await?
            }
            PageMode::Offset { page_offset } => {
                let builder = filters.query_with_limit((page_offset + probe) as i64);
                let docs = self.run_with_retry(&builder.build(), cancel).await?;
                docs.into_iter().skip(*page_offset).collect()
            }
        };

        let mut products = decode_all(&docs);
        let has_more = products.len() > page_size;
        products.truncate(page_size);
        let last_product_id = products.last().map(|p| p.id.clone());
        Ok(ProductPage {
            products,
            has_more,
            last_product_id,
        })
    }

    /// Fetch the entire catalog, unfiltered and unordered. Used by the
    /// search fallback to build its snapshot.
    pub async fn fetch_all(&self, cancel: &CancelToken) -> Result<Vec<Product>, CatalogError> {
        let docs = self
            .run_with_retry(&StructuredQuery::default(), cancel)
            .await?;
        Ok(decode_all(&docs))
    }
}
