use super::upstream_failure;
use crate::dtos::{ChatRequest, ChatResponse};
use crate::services::Turn;
use crate::startup::AppState;
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;

/// `POST /chat`: persona instruction first, the caller's message verbatim second.
pub async fn chat(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ChatRequest>, AppError>,
) -> Result<Json<ChatResponse>, AppError> {
    let turns = [
        Turn::user(&*state.persona_instruction),
        Turn::user(payload.message),
    ];

    tracing::info!(message_len = turns[1].text.len(), "Relaying chat message");

    let response = state
        .text_provider
        .generate(&turns)
        .await
        .map_err(|e| upstream_failure("Internal server error while processing message", e))?;

    Ok(Json(ChatResponse { response }))
}
