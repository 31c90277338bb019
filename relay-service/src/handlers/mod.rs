//! HTTP handlers for the relay service.

pub mod chat;
pub mod describe_image;
pub mod health;

pub use chat::chat;
pub use describe_image::describe_image;
pub use health::health_check;

use crate::services::ProviderError;
use service_core::error::AppError;

/// Boundary adapter for upstream failures: every provider error becomes a 500
/// whose detail is `context: cause`.
pub(crate) fn upstream_failure(context: &'static str, err: ProviderError) -> AppError {
    let kind = match &err {
        ProviderError::Transport(_) => "transport",
        ProviderError::Format(_) => "format",
    };
    tracing::warn!(kind = kind, "Upstream generation failed");
    AppError::InternalError(anyhow::Error::new(err).context(context))
}
