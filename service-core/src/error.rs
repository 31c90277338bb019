use axum::{
    Json,
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// Request rejected by an extractor before reaching the handler.
    #[error("Invalid request: {1}")]
    InvalidRequest(StatusCode, String),

    #[error("Internal server error: {0:#}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

/// Error body returned to callers for every failure status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::InvalidRequest(status, msg) => (status, msg),
            AppError::InternalError(err) => {
                // Full chain (and backtrace when RUST_BACKTRACE is set) stays server-side.
                tracing::error!(error = ?err, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "Configuration error surfaced in a request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, extract::Multipart, http::Request, routing::post};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_renders_context_chain_as_detail() {
        let err = anyhow::anyhow!("upstream returned status 503")
            .context("Internal server error while processing message");
        let res = AppError::InternalError(err).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(
            body["detail"],
            "Internal server error while processing message: upstream returned status 503"
        );
    }

    #[tokio::test]
    async fn invalid_request_keeps_extractor_status() {
        let res = AppError::InvalidRequest(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing field `message`".to_string(),
        )
        .into_response();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(res).await;
        assert_eq!(body["detail"], "missing field `message`");
    }

    #[tokio::test]
    async fn config_error_hides_cause_from_caller() {
        let res = AppError::ConfigError(anyhow::anyhow!("GEMINI_API_KEY=secret")).into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["detail"], "Configuration error");
    }

    async fn upload(multipart: Result<Multipart, MultipartRejection>) -> Result<StatusCode, AppError> {
        let _multipart = multipart?;
        Ok(StatusCode::NO_CONTENT)
    }

    #[tokio::test]
    async fn multipart_rejection_renders_as_detail() {
        let app = Router::new().route("/upload", post(upload));
        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"file":"not-a-file"}"#))
            .unwrap();

        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));
    }

    #[test]
    fn bad_request_display() {
        let err = AppError::BadRequest(anyhow::anyhow!("No file uploaded"));
        assert_eq!(err.to_string(), "Bad request: No file uploaded");
    }
}
