//! Public search endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use velo_catalog::Product;
use velo_data::cancel::CancelToken;

use crate::error::ApiError;
use crate::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// `GET /api/search?q&limit&offset&type=suggestions`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Products { products: Vec<Product> },
    Suggestions { suggestions: Vec<String> },
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchPayload>, ApiError> {
    let mut query = String::new();
    let mut limit = DEFAULT_LIMIT;
    let mut offset = 0usize;
    let mut suggestions = false;
    for (key, value) in &pairs {
        match key.as_str() {
            "q" => query = value.clone(),
            "limit" => limit = value.parse().map(|l: usize| l.min(MAX_LIMIT)).unwrap_or(DEFAULT_LIMIT),
            "offset" => offset = value.parse().unwrap_or(0),
            "type" => suggestions = value == "suggestions",
            _ => {}
        }
    }

    let cancel = CancelToken::new();
    if suggestions {
        let suggestions = state.search.suggest(&state.repo, &query, &cancel).await?;
        return Ok(Json(SearchPayload::Suggestions { suggestions }));
    }
    let products = state
        .search
        .search(&state.repo, &query, limit, offset, &cancel)
        .await?;
    Ok(Json(SearchPayload::Products { products }))
}
