//! Bearer-token admin authentication.
//!
//! The auth provider is an external collaborator: it issues bearer tokens
//! elsewhere and this layer only verifies them. Admin endpoints respond
//! 401 whenever the `Authorization: Bearer` header is absent or the token
//! does not verify.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use thiserror::Error;

use crate::{ApiError, AppState};

/// Token verification errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
}

/// The verified admin identity behind a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: String,
}

/// Verifies bearer tokens issued by the auth provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AdminUser, AuthError>;
}

/// A fixed token set, for local runs and tests.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `admin_id`.
    pub fn allow(mut self, token: impl Into<String>, admin_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), admin_id.into());
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AdminUser, AuthError> {
        self.tokens
            .get(token)
            .map(|id| AdminUser { id: id.clone() })
            .ok_or(AuthError::InvalidToken)
    }
}

/// Extractor gating admin handlers on a verified bearer token.
#[derive(Debug, Clone)]
pub struct AdminClaims {
    pub user: AdminUser,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let user = state
            .verifier
            .verify(token)
            .await
            .map_err(|_| ApiError::Unauthorized)?;
        Ok(AdminClaims { user })
    }
}
