//! Public storefront browsing.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use velo_catalog::prelude::{page_window, percent_decode, Product};
use velo_catalog::ProductId;
use velo_data::cancel::CancelToken;

use crate::error::ApiError;
use crate::params::ListingParams;
use crate::AppState;

/// One page of a category listing, with everything the pagination UI
/// needs to render its controls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    pub products: Vec<Product>,
    pub page: u32,
    pub total: u64,
    pub total_pages: u32,
    pub page_numbers: Vec<u32>,
    pub has_more: bool,
    pub last_product_id: Option<String>,
    pub view: &'static str,
}

/// `GET /api/categories/:category/:subCategory/products`
///
/// Accepts `brand` (repeatable), `minPrice`, `maxPrice`, `sort`, `view`,
/// `page`, `lastId`. The presence of `lastId` selects cursor pagination;
/// its absence selects offset pagination.
pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path((category, sub_category)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<BrowsePage>, ApiError> {
    let params = ListingParams::from_pairs(&pairs);
    let cancel = CancelToken::new();

    let mut filters = params.filters();
    filters.categories = vec![percent_decode(&category)];
    filters.sub_categories = vec![percent_decode(&sub_category)];

    let mode = params.page_params().mode(filters.page_size);
    let page = state.repo.fetch_page(&filters, &mode, &cancel).await?;
    let total = state.repo.count(&filters, &cancel).await?;

    let page_size = filters.page_size.max(1) as u64;
    let total_pages = (total.div_ceil(page_size)).max(1) as u32;
    let current = params.page.min(total_pages).max(1);
    let window = page_window(current, total_pages);

    Ok(Json(BrowsePage {
        products: page.products,
        page: current,
        total,
        total_pages,
        page_numbers: window.numbers,
        has_more: page.has_more,
        last_product_id: page.last_product_id.map(|id| id.into_inner()),
        view: params.view.as_str(),
    }))
}

/// `GET /api/products/recommended`
pub async fn recommended(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.repo.fetch_recommended(&CancelToken::new()).await?;
    Ok(Json(products))
}

/// `GET /api/products/:id`
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .repo
        .fetch_by_id(&ProductId::new(&id), &CancelToken::new())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}
