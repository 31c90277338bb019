use super::upstream_failure;
use crate::dtos::DescribeResponse;
use crate::services::providers::InlineImage;
use crate::services::Turn;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use service_core::error::AppError;

pub const DESCRIBE_IMAGE_INSTRUCTION: &str = "Describe this image in plain English.";

/// Name of the multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// `POST /describe-image`: the whole upload is buffered, base64-encoded and
/// sent inline next to a fixed instruction.
pub async fn describe_image(
    State(state): State<AppState>,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Json<DescribeResponse>, AppError> {
    let image = read_file_field(&mut multipart).await?;

    tracing::info!(
        mime_type = %image.mime_type,
        encoded_len = image.data.len(),
        "Relaying image description request"
    );

    let turn = Turn::user(DESCRIBE_IMAGE_INSTRUCTION).with_image(image);
    let description = state
        .text_provider
        .generate(std::slice::from_ref(&turn))
        .await
        .map_err(|e| upstream_failure("Gemini image request failed", e))?;

    Ok(Json(DescribeResponse { description }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<InlineImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mime_type = field.content_type().unwrap_or(DEFAULT_MIME_TYPE).to_string();
        let data = field.bytes().await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
        })?;

        return Ok(InlineImage {
            mime_type,
            data: STANDARD.encode(&data),
        });
    }

    Err(AppError::InvalidRequest(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Missing form field `{}`", FILE_FIELD),
    ))
}
