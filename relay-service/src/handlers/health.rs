use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check. Never contacts the upstream API.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "relay-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
