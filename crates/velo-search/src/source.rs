//! The product source the search layer reads from.

use async_trait::async_trait;
use velo_catalog::prelude::ProductRepository;
use velo_catalog::{CatalogError, Product, ProductId};
use velo_data::cancel::CancelToken;
use velo_store::CollectionStore;

/// Where search gets its products: the full snapshot for the fallback
/// scorer, and point lookups for resolving external-index hits.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn all_products(&self, cancel: &CancelToken) -> Result<Vec<Product>, CatalogError>;

    async fn product(
        &self,
        id: &ProductId,
        cancel: &CancelToken,
    ) -> Result<Option<Product>, CatalogError>;
}

#[async_trait]
impl<S: CollectionStore + ?Sized> ProductSource for ProductRepository<S> {
    async fn all_products(&self, cancel: &CancelToken) -> Result<Vec<Product>, CatalogError> {
        self.fetch_all(cancel).await
    }

    async fn product(
        &self,
        id: &ProductId,
        cancel: &CancelToken,
    ) -> Result<Option<Product>, CatalogError> {
        self.fetch_by_id(id, cancel).await
    }
}
