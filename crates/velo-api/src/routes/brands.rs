//! Admin brand CRUD against the category structure document.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use velo_catalog::prelude::CategoryStructure;

use crate::auth::AdminClaims;
use crate::error::ApiError;
use crate::AppState;

/// The brand listing: the raw structure plus its flattened derivation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandsView {
    pub brands: Vec<String>,
    pub categories: CategoryStructure,
}

/// `GET /api/admin/brands`
pub async fn list(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
) -> Result<Json<BrandsView>, ApiError> {
    let structure = load(&state).await?;
    Ok(Json(BrandsView {
        brands: structure.all_brands(),
        categories: structure,
    }))
}

/// `POST /api/admin/brands` body.
#[derive(Debug, Deserialize)]
pub struct NewBrand {
    pub name: String,
    pub category: String,
    pub subcategory: String,
}

/// `POST /api/admin/brands`
pub async fn create(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBrand>,
) -> Result<(StatusCode, Json<BrandsView>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("brand name is required".to_string()));
    }
    let mut structure = load(&state).await?;
    if !structure.add_brand(&body.category, &body.subcategory, body.name.trim()) {
        return Err(ApiError::BadRequest(format!(
            "brand {} already exists in {}/{}",
            body.name, body.category, body.subcategory
        )));
    }
    save(&state, &structure).await?;
    Ok((
        StatusCode::CREATED,
        Json(BrandsView {
            brands: structure.all_brands(),
            categories: structure,
        }),
    ))
}

/// `DELETE /api/admin/brands?name&category&subcategory`
pub async fn remove(
    _claims: AdminClaims,
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<BrandsView>, ApiError> {
    let mut name = None;
    let mut category = None;
    let mut subcategory = None;
    for (key, value) in &pairs {
        match key.as_str() {
            "name" => name = Some(value.clone()),
            "category" => category = Some(value.clone()),
            "subcategory" => subcategory = Some(value.clone()),
            _ => {}
        }
    }
    let (name, category, subcategory) = match (name, category, subcategory) {
        (Some(n), Some(c), Some(s)) => (n, c, s),
        _ => {
            return Err(ApiError::BadRequest(
                "name, category, and subcategory are required".to_string(),
            ))
        }
    };

    let mut structure = load(&state).await?;
    if !structure.remove_brand(&category, &subcategory, &name) {
        return Err(ApiError::NotFound(format!(
            "brand {name} in {category}/{subcategory}"
        )));
    }
    save(&state, &structure).await?;
    Ok(Json(BrandsView {
        brands: structure.all_brands(),
        categories: structure,
    }))
}

async fn load(state: &AppState) -> Result<CategoryStructure, ApiError> {
    Ok(CategoryStructure::load(state.repo.store().as_ref()).await?)
}

async fn save(state: &AppState, structure: &CategoryStructure) -> Result<(), ApiError> {
    Ok(structure.save(state.repo.store().as_ref()).await?)
}
