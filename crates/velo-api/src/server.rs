//! Router assembly and the server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{brands, browse, products, search};
use crate::AppState;

/// Assemble the full router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any);
    Router::new()
        .route("/api", get(|| async { "VeloCommerce API is running!" }))
        .route(
            "/api/categories/:category/:sub_category/products",
            get(browse::list_by_category),
        )
        .route("/api/products/recommended", get(browse::recommended))
        .route("/api/products/:id", get(browse::get_product))
        .route("/api/search", get(search::search))
        .route(
            "/api/admin/products",
            get(products::list)
                .post(products::create)
                .put(products::update),
        )
        .route(
            "/api/admin/brands",
            get(brands::list).post(brands::create).delete(brands::remove),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
