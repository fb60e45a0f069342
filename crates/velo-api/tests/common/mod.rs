#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;
use velo_api::{build_router, AppState, StaticTokenVerifier};
use velo_catalog::prelude::CategoryStructure;
use velo_search::SearchService;
use velo_store::{CollectionStore, MemoryObjectStorage, MemoryStore};

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

/// Twelve road/race bikes plus three mountain bikes and one corrupt row.
fn seed_products(store: &MemoryStore) {
    let brands = ["Trek", "Giant", "Canyon"];
    for i in 1..=12u32 {
        store.seed(
            "products",
            format!("r{i:02}"),
            fields(json!({
                "name": format!("Road Bike {i:02}"),
                "category": "road",
                "subCategory": "race",
                "brand": brands[(i as usize - 1) % 3],
                "actualPrice": 500.0 + f64::from(i) * 100.0,
                "rating": 3.0 + f64::from(i) * 0.1,
                "inventory": 2,
            })),
        );
    }
    for i in 1..=3u32 {
        store.seed(
            "products",
            format!("m{i:02}"),
            fields(json!({
                "name": format!("Mountain Bike {i:02}"),
                "category": "mountain",
                "subCategory": "hardtail",
                "brand": "Canyon",
                "actualPrice": 900.0 + f64::from(i) * 100.0,
                "rating": 4.0,
                "inventory": 2,
                "isRecommended": i == 1,
            })),
        );
    }
    // Fails the schema; must never appear in any listing.
    store.seed(
        "products",
        "broken",
        fields(json!({
            "name": "Mystery",
            "category": "mountain",
            "subCategory": "hardtail",
            "actualPrice": "free",
            "rating": 0.5,
        })),
    );
}

pub async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    seed_products(&store);

    let mut structure = CategoryStructure::new();
    structure.add_brand("road", "race", "Trek");
    structure.add_brand("road", "race", "Giant");
    structure.add_brand("mountain", "hardtail", "Canyon");
    structure.save(store.as_ref()).await.unwrap();

    let state = Arc::new(AppState::new(
        store as Arc<dyn CollectionStore>,
        SearchService::new(),
        Arc::new(MemoryObjectStorage::new()),
        Arc::new(StaticTokenVerifier::new().allow(ADMIN_TOKEN, "admin-1")),
    ));
    build_router(state)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, None, None).await
}

pub async fn get_admin(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, Some(ADMIN_TOKEN), None).await
}

pub fn names(products: &Value) -> Vec<String> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}
