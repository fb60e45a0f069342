//! Local development server backed by the in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use velo_api::{serve, AppState, StaticTokenVerifier};
use velo_catalog::prelude::CategoryStructure;
use velo_search::SearchService;
use velo_store::{CollectionStore, MemoryObjectStorage, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = Arc::new(seeded_store());
    let mut structure = CategoryStructure::new();
    structure.add_brand("road", "race", "Specialized");
    structure.add_brand("road", "gravel", "Canyon");
    structure.add_brand("mountain", "hardtail", "Trek");
    structure.save(store.as_ref()).await?;

    let state = Arc::new(AppState::new(
        store as Arc<dyn CollectionStore>,
        SearchService::new(),
        Arc::new(MemoryObjectStorage::new()),
        Arc::new(StaticTokenVerifier::new().allow("dev-admin-token", "dev-admin")),
    ));

    let addr = SocketAddr::from(([127, 0, 0, 1], 4000));
    serve(addr, state).await
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for (id, fields) in demo_products() {
        store.seed("products", id, fields);
    }
    store
}

fn demo_products() -> Vec<(&'static str, Map<String, Value>)> {
    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    vec![
        (
            "demo-1",
            fields(json!({
                "name": "Aero Road SL7", "category": "road", "subCategory": "race",
                "brand": "Specialized", "actualPrice": 2400.0, "rating": 4.6,
                "inventory": 3, "isRecommended": true,
            })),
        ),
        (
            "demo-2",
            fields(json!({
                "name": "Gravel One", "category": "road", "subCategory": "gravel",
                "brand": "Canyon", "actualPrice": 2100.0, "discountPercentage": 15.0,
                "rating": 4.8, "inventory": 5,
            })),
        ),
        (
            "demo-3",
            fields(json!({
                "name": "Trail Hardtail", "category": "mountain", "subCategory": "hardtail",
                "brand": "Trek", "actualPrice": 1800.0, "rating": 4.8,
                "inventory": 2, "isRecommended": true,
            })),
        ),
    ]
}
