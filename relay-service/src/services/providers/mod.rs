//! Upstream text-generation providers.
//!
//! Handlers only see the [`TextProvider`] trait, so the Gemini backend can be
//! swapped for [`mock::MockTextProvider`] in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, non-2xx status, or a body that is not JSON.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Well-formed JSON without a usable first candidate.
    #[error("Unexpected upstream response format: {0}")]
    Format(String),
}

/// Speaker of a turn. The relay only ever sends user turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

/// Binary attachment sent inline with a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64 of the raw bytes.
    pub data: String,
}

/// One role-tagged message unit of the upstream conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub image: Option<InlineImage>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `turns` upstream in order and return the first candidate's text.
    async fn generate(&self, turns: &[Turn]) -> Result<String, ProviderError>;
}
