//! HTTP surface for the VeloCommerce storefront and admin panel.
//!
//! Public endpoints serve category browsing (with the hybrid pagination
//! encoding: presence of `lastId` selects cursor mode) and search; admin
//! endpoints behind a bearer token serve product and brand CRUD.

pub mod auth;
pub mod error;
pub mod params;
pub mod routes;
pub mod server;

pub use auth::{AdminClaims, AdminUser, AuthError, StaticTokenVerifier, TokenVerifier};
pub use error::ApiError;
pub use server::{build_router, serve};

use std::sync::Arc;

use velo_catalog::prelude::ProductRepository;
use velo_search::SearchService;
use velo_store::{CollectionStore, ObjectStorage};

/// Shared application state.
pub struct AppState {
    pub repo: ProductRepository<dyn CollectionStore>,
    pub search: SearchService,
    pub storage: Arc<dyn ObjectStorage>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        search: SearchService,
        storage: Arc<dyn ObjectStorage>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            repo: ProductRepository::new(store),
            search,
            storage,
            verifier,
        }
    }
}
