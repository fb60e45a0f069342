//! Admin product CRUD.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use velo_catalog::prelude::{PageMode, ProductDraft};
use velo_catalog::{Product, ProductId};
use velo_data::cancel::CancelToken;

use crate::auth::AdminClaims;
use crate::error::ApiError;
use crate::params::AdminListParams;
use crate::AppState;

/// The admin listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductList {
    pub products: Vec<Product>,
    pub has_more: bool,
    pub last_product_id: Option<String>,
}

/// `GET /api/admin/products?pageSize&startAfterId&search&category&subCategory&brand`
pub async fn list(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<AdminProductList>, ApiError> {
    let params = AdminListParams::from_pairs(&pairs);
    let cancel = CancelToken::new();
    let filters = params.filters();
    let page_size = filters.page_size;

    if let Some(search) = params.search.as_deref() {
        // Text search: score the catalog, probe one row past the page.
        let mut products = state
            .search
            .search(&state.repo, search, page_size + 1, 0, &cancel)
            .await?;
        let has_more = products.len() > page_size;
        products.truncate(page_size);
        let last_product_id = products.last().map(|p| p.id.to_string());
        return Ok(Json(AdminProductList {
            products,
            has_more,
            last_product_id,
        }));
    }

    let mode = match params.start_after_id.as_deref() {
        Some(last_id) => PageMode::Cursor {
            last_id: ProductId::new(last_id),
        },
        None => PageMode::Offset { page_offset: 0 },
    };
    let page = state.repo.fetch_page(&filters, &mode, &cancel).await?;
    Ok(Json(AdminProductList {
        products: page.products,
        has_more: page.has_more,
        last_product_id: page.last_product_id.map(|id| id.into_inner()),
    }))
}

/// `POST /api/admin/products` — phase-1 create.
///
/// The body is the draft product shape; images are uploaded afterwards and
/// patched in via `PUT`. Responds 400 with per-field errors on schema
/// violations.
pub async fn create(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let errors = draft.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let product = state
        .repo
        .create_with_images(draft, &[], state.storage.as_ref(), &CancelToken::new())
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products` — full replace, including the phase-2 image
/// URL patch.
pub async fn update(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
    Json(product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    let errors = product.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    state
        .repo
        .update_product(&product, &CancelToken::new())
        .await?;
    Ok(Json(product))
}
