mod common;

use axum::http::StatusCode;
use common::{app, get, get_admin, request, ADMIN_TOKEN};
use serde_json::json;

#[tokio::test]
async fn test_brands_require_token() {
    let app = app().await;
    let (status, _) = get(&app, "/api/admin/brands").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_brands() {
    let app = app().await;
    let (status, body) = get_admin(&app, "/api/admin/brands").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brands"], json!(["Canyon", "Giant", "Trek"]));
    assert_eq!(
        body["categories"]["road"]["race"]["brands"],
        json!(["Trek", "Giant"])
    );
}

#[tokio::test]
async fn test_add_brand() {
    let app = app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/brands",
        Some(ADMIN_TOKEN),
        Some(json!({"name": "Santa Cruz", "category": "mountain", "subcategory": "hardtail"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["brands"]
        .as_array()
        .unwrap()
        .contains(&json!("Santa Cruz")));

    // The structure document persisted the change.
    let (_, listed) = get_admin(&app, "/api/admin/brands").await;
    assert_eq!(
        listed["categories"]["mountain"]["hardtail"]["brands"],
        json!(["Canyon", "Santa Cruz"])
    );
}

#[tokio::test]
async fn test_add_duplicate_brand_rejected() {
    let app = app().await;
    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/brands",
        Some(ADMIN_TOKEN),
        Some(json!({"name": "trek", "category": "road", "subcategory": "race"})),
    )
    .await;
    // Uniqueness within a subcategory is case-insensitive.
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_brand() {
    let app = app().await;
    let (status, body) = request(
        &app,
        "DELETE",
        "/api/admin/brands?name=Giant&category=road&subcategory=race",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brands"], json!(["Canyon", "Trek"]));

    let (status, _) = request(
        &app,
        "DELETE",
        "/api/admin/brands?name=Giant&category=road&subcategory=race",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_brand_requires_all_params() {
    let app = app().await;
    let (status, _) = request(
        &app,
        "DELETE",
        "/api/admin/brands?name=Giant",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
