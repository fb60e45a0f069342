mod common;

use axum::http::StatusCode;
use common::{app, get, names};
use serde_json::json;

#[tokio::test]
async fn test_short_query_returns_empty_without_search() {
    let app = app().await;
    let (status, body) = get(&app, "/api/search?q=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"products": []}));
}

#[tokio::test]
async fn test_search_matches_names() {
    let app = app().await;
    let (status, body) = get(&app, "/api/search?q=mountain%20bike").await;
    assert_eq!(status, StatusCode::OK);
    let listed = names(&body["products"]);
    // Full-phrase matches outrank the road bikes that only share the
    // "bike" token.
    assert!(listed[..3].iter().all(|n| n.starts_with("Mountain Bike")));
    assert_eq!(listed.len(), 15);
}

#[tokio::test]
async fn test_search_limit_and_offset() {
    let app = app().await;
    let (_, all) = get(&app, "/api/search?q=road%20bike&limit=20").await;
    let all_names = names(&all["products"]);
    // Twelve full-phrase road matches rank ahead of the partial
    // "bike"-token matches from the mountain range.
    assert_eq!(all_names.len(), 15);
    assert!(all_names[..12].iter().all(|n| n.starts_with("Road")));

    let (_, page) = get(&app, "/api/search?q=road%20bike&limit=5&offset=5").await;
    let page_names = names(&page["products"]);
    assert_eq!(page_names.len(), 5);
    assert_eq!(page_names[0], all_names[5]);
}

#[tokio::test]
async fn test_search_by_brand() {
    let app = app().await;
    let (status, body) = get(&app, "/api/search?q=canyon&limit=20").await;
    assert_eq!(status, StatusCode::OK);
    // Four Canyon road bikes plus three Canyon mountain bikes.
    assert_eq!(body["products"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_suggestions() {
    let app = app().await;
    let (status, body) = get(&app, "/api/search?q=mou&type=suggestions").await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 5);
    assert_eq!(suggestions[0], "mountain");
}

#[tokio::test]
async fn test_short_suggestion_query_is_empty() {
    let app = app().await;
    let (status, body) = get(&app, "/api/search?q=m&type=suggestions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"suggestions": []}));
}
