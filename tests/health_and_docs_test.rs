mod common;

use axum::http::{Method, StatusCode};

use common::{response_json, TestApp};

#[tokio::test]
async fn liveness_reports_up() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn readiness_checks_both_stores() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["sales_store"]["status"], "up");
    assert_eq!(body["checks"]["recipe_store"]["status"], "up");
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health", None).await;
    let id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();
    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["info"]["title"], "Inventory Forecast API");
    assert!(body["paths"]["/api/v1/predict"]["post"].is_object());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/api/v1/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
