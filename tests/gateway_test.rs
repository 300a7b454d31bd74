//! Gateway HTTP surface tests

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use nfc_dashboard::events::Partition;
use nfc_dashboard::gateway::{self, GatewayState};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::*;

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_logs_capped_to_ten_largest_keys_ascending() {
    let base = 1_700_000_000_000i64;
    let logs: Vec<(i64, Value)> = (0..12)
        .map(|i| (base + i * 1000, json!(format!("scan {}", i))))
        .collect();
    let store = seeded_store(&logs, &[]).await;

    let (status, body) = get_json(gateway::router(GatewayState::new(store, 10)), "/api/logs").await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 10);

    let timestamps: Vec<i64> = records
        .iter()
        .map(|r| r["timestamp"].as_i64().unwrap())
        .collect();
    let expected: Vec<i64> = (2..12).map(|i| base + i * 1000).collect();
    assert_eq!(timestamps, expected);

    assert_eq!(records[0]["message"], "scan 2");
    assert_eq!(records[0]["time"], "2023-11-14T22:13:22.000Z");
}

#[tokio::test]
async fn test_verified_messages_passed_through() {
    let store = seeded_store(
        &[],
        &[(300, json!("yes")), (100, json!(true)), (200, json!(false))],
    )
    .await;

    let (status, body) =
        get_json(gateway::router(GatewayState::new(store, 10)), "/api/verified").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"timestamp": 100, "time": "1970-01-01T00:00:00.100Z", "message": true},
            {"timestamp": 200, "time": "1970-01-01T00:00:00.200Z", "message": false},
            {"timestamp": 300, "time": "1970-01-01T00:00:00.300Z", "message": "yes"}
        ])
    );
}

#[tokio::test]
async fn test_empty_partition_returns_empty_array() {
    let store = seeded_store(&[(100, json!("A"))], &[]).await;

    let (status, body) =
        get_json(gateway::router(GatewayState::new(store, 10)), "/api/verified").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_non_timestamp_keys_are_skipped() {
    let store = seeded_store(&[(100, json!("A"))], &[]).await;
    store.insert(Partition::Log, "metadata", json!({"v": 1})).await;

    let (_, body) = get_json(gateway::router(GatewayState::new(store, 10)), "/api/logs").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["timestamp"], 100);
}

#[tokio::test]
async fn test_store_failure_returns_structured_500() {
    let app = gateway::router(GatewayState::new(FailingStore, 10));

    let (status, body) = get_json(app.clone(), "/api/logs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Error reading logs"}));

    let (status, body) = get_json(app, "/api/verified").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Error reading verified entries"}));
}

#[tokio::test]
async fn test_gateway_keeps_serving_after_store_failure() {
    let app = gateway::router(GatewayState::new(FailingStore, 10));

    for _ in 0..3 {
        let (status, _) = get_json(app.clone(), "/api/logs").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "nfc-dashboard");
}

#[tokio::test]
async fn test_cors_allows_dashboard_origin() {
    let store = seeded_store(&[(100, json!("A"))], &[]).await;
    let app = gateway::app(GatewayState::new(store, 10), "http://localhost:5173").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/logs")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let preflight = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/verified")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    assert!(preflight
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_cors_rejects_other_origins() {
    let store = seeded_store(&[(100, json!("A"))], &[]).await;
    let app = gateway::app(GatewayState::new(store, 10), "http://localhost:5173").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/logs")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[test]
fn test_invalid_cors_origin_is_config_error() {
    assert!(gateway::cors_layer("bad\norigin").is_err());
    assert!(gateway::cors_layer("*").is_ok());
}
