//! API error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use velo_catalog::{CatalogError, FieldError};
use velo_search::SearchError;

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// The submitted body violates the product schema.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Anything the caller cannot fix: exhausted retries, backend
    /// failures, bugs.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation { field, message } => {
                ApiError::Validation(vec![FieldError { field, message }])
            }
            CatalogError::ProductNotFound(id) => ApiError::NotFound(format!("product {id}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Catalog(inner) => inner.into(),
            SearchError::Index(message) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "unauthorized"}),
            ),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "validation failed", "fields": fields}),
            ),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({"error": message}))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({"error": message})),
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal error"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
