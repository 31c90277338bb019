//! Integration tests for the relay's health endpoint and response headers.

mod common;

use common::TestApp;
use wiremock::MockServer;

#[tokio::test]
async fn health_check_returns_ok_without_calling_upstream() {
    let server = MockServer::start().await;
    let app = TestApp::spawn(&server).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "relay-service");

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let server = MockServer::start().await;
    let app = TestApp::spawn(&server).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .expect("Failed to send request");

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "trace-me-123");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}
