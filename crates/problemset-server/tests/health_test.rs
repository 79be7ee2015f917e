mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use helpers::{FailingCache, FailingStore, client, client_with_state, moka, seeded_store, state_with};

#[tokio::test]
async fn health_check_returns_200() {
    client().get("/health").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn health_check_returns_json() {
    let response = client().get("/health").await;

    let content_type = response.header("content-type").unwrap();
    assert!(content_type.contains("application/json"));
}

#[tokio::test]
async fn health_check_body_reports_components() {
    let body: Value = client().get("/health").await.json();

    assert_eq!(body["status"], "UP");
    assert_eq!(body["store"]["status"], "UP");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["cache"]["backend"], "moka");
}

#[tokio::test]
async fn store_down_returns_503() {
    let client = client_with_state(state_with(Arc::new(FailingStore), moka()));

    let response = client.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["store"]["status"], "DOWN");
    assert!(body["store"]["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn cache_down_keeps_service_up() {
    let client = client_with_state(state_with(Arc::new(seeded_store()), Arc::new(FailingCache)));

    let response = client.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["cache"]["status"], "DOWN");

    // Las lecturas siguen funcionando sin cache
    client
        .get("/api/v1/problems/1")
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn store_down_surfaces_as_503_on_reads() {
    let client = client_with_state(state_with(Arc::new(FailingStore), moka()));

    client
        .get("/api/v1/problems/stats")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
