mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{response_json, TestApp};
use paperstore_api::{build_router, tracing::REQUEST_ID_HEADER};
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn status_reports_service_identity() {
    let app = TestApp::new().await;

    let body = response_json(app.request(Method::GET, "/status", None).await).await;
    assert_eq!(body["service"], "paperstore-api");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = response_json(response).await;
    assert!(doc["paths"]["/api/order"]["post"].is_object());
    assert!(doc["paths"]["/api/property/{id}/canDelete"]["get"].is_object());
}

#[tokio::test]
async fn error_bodies_echo_request_id() {
    let app = TestApp::new().await;
    let router = build_router(app.state.clone());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/order/4040")
        .header(REQUEST_ID_HEADER, "support-ticket-17")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "support-ticket-17"
    );

    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["request_id"], "support-ticket-17");
    assert!(body["timestamp"].is_string());
}
