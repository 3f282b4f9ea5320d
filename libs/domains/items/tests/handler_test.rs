//! Handler tests for the Items domain
//!
//! Drive the items router directly with `oneshot()` against the in-memory
//! repository: status codes, JSON bodies and error responses.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use chrono::Utc;
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> (Router, ItemService<InMemoryItemRepository>) {
    let service = ItemService::new(InMemoryItemRepository::new());
    (handlers::router(service.clone()), service)
}

fn post(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn hammer() -> Value {
    json!({
        "ownerId": "u1",
        "keywords": ["hammer", "nails"],
        "description": "toolbox",
        "latitude": 51.28,
        "longitude": 1.08
    })
}

#[tokio::test]
async fn test_create_item_returns_201() {
    let (app, _) = app();

    let before = Utc::now();
    let response = app.oneshot(post(hammer())).await.unwrap();
    let after = Utc::now();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    let item: Item = serde_json::from_value(body.clone()).unwrap();
    assert!(before <= item.valid_from && item.valid_from <= after);
    assert_eq!(body["ownerId"], "u1");
    assert_eq!(body["keywords"], json!(["hammer", "nails"]));
    assert_eq!(body["validFrom"], body["validTo"]);
    assert!(body.get("image").is_none());
}

#[tokio::test]
async fn test_create_item_missing_field_names_it() {
    let (app, service) = app();
    let mut payload = hammer();
    payload.as_object_mut().unwrap().remove("description");

    let response = app.oneshot(post(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.details.unwrap()["field"], "description");
    assert_eq!(service.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_item_out_of_range_latitude() {
    let (app, _) = app();
    let mut payload = hammer();
    payload["latitude"] = json!(-90.5);

    let response = app.oneshot(post(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.details.unwrap()["field"], "latitude");
}

#[tokio::test]
async fn test_create_item_reports_missing_before_mistyped() {
    let (app, service) = app();
    let payload = json!({
        "keywords": ["a"],
        "description": "d",
        "latitude": "51.2",
        "longitude": 1
    });

    let response = app.oneshot(post(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.details.unwrap()["field"], "ownerId");
    assert_eq!(service.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_item_mistyped_field_names_it() {
    let (app, _) = app();
    let mut payload = hammer();
    payload["keywords"] = json!(["a", 5]);

    let response = app.clone().oneshot(post(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.details.unwrap()["field"], "keywords");

    let mut payload = hammer();
    payload["latitude"] = json!("51.2");

    let response = app.oneshot(post(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.details.unwrap()["field"], "latitude");
}

#[tokio::test]
async fn test_create_item_malformed_json() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"ownerId\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_then_delete_then_not_found() {
    let (app, _) = app();

    let response = app.clone().oneshot(post(hammer())).await.unwrap();
    let created: Item = json_body(response.into_body()).await;
    let uri = format!("/{}", created.id);

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Item = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    let response = app.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "NOT_FOUND");

    let response = app.oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_returns_400() {
    let (app, _) = app();

    let response = app.clone().oneshot(get("/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_UUID");

    let response = app.oneshot(delete("/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filter_by_keyword() {
    let (app, service) = app();
    service.seed_demo_item().await.unwrap();
    service.create_item(serde_json::from_value(hammer()).unwrap()).await.unwrap();

    let response = app.clone().oneshot(get("/?keyword=TOOLS")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<Item> = json_body(response.into_body()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].keywords, vec!["saw", "wood", "tools"]);

    let response = app.oneshot(get("/?keyword=hammer&ownerId=u2")).await.unwrap();
    let items: Vec<Item> = json_body(response.into_body()).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_filter_by_bounding_box() {
    let (app, service) = app();
    service.seed_demo_item().await.unwrap();
    service.create_item(serde_json::from_value(hammer()).unwrap()).await.unwrap();

    let response = app
        .oneshot(get("/?minLat=50&maxLat=52&minLon=0&maxLon=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<Item> = json_body(response.into_body()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].owner_id, "u1");
}

#[tokio::test]
async fn test_filter_rejects_bad_bounding_box() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(get("/?minLat=10&maxLat=5&minLon=0&maxLon=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.details.unwrap()["field"], "maxLat");

    let response = app.oneshot(get("/?minLat=10&maxLat=20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.details.unwrap()["field"], "minLon");
}

#[tokio::test]
async fn test_filter_by_valid_at() {
    let (app, service) = app();
    let item = service.seed_demo_item().await.unwrap();

    // An unencoded `+` arrives as a space.
    let instant = item.valid_from.to_rfc3339();
    assert!(instant.ends_with("+00:00"));
    let response = app
        .clone()
        .oneshot(get(&format!("/?validAt={instant}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items: Vec<Item> = json_body(response.into_body()).await;
    assert_eq!(items.len(), 1);

    let response = app.oneshot(get("/?validAt=soon")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert_eq!(error.details.unwrap()["field"], "validAt");
}

#[tokio::test]
async fn test_filter_rejects_unparsable_query() {
    let (app, _) = app();

    let response = app.oneshot(get("/?minLat=north")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_QUERY");
}

#[tokio::test]
async fn test_list_and_count_after_creates_and_deletes() {
    let (app, service) = app();

    let mut ids = Vec::new();
    for n in 0..5 {
        let mut payload = hammer();
        payload["ownerId"] = json!(format!("u{n}"));
        let response = app.clone().oneshot(post(payload)).await.unwrap();
        let item: Item = json_body(response.into_body()).await;
        ids.push(item.id);
    }
    for id in ids.drain(..2) {
        service.delete_item(id).await.unwrap();
    }

    let response = app.clone().oneshot(get("/")).await.unwrap();
    let items: Vec<Item> = json_body(response.into_body()).await;
    let listed: Vec<_> = items.iter().map(|i| i.id).collect();
    assert_eq!(listed, ids);

    let response = app.oneshot(get("/count")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let count: u64 = json_body(response.into_body()).await;
    assert_eq!(count, 3);
}
