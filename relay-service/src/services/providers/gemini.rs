//! Gemini AI provider implementation.
//!
//! One awaited `generateContent` round trip per call. No retries, no
//! streaming, and no timeout beyond the client's default.

use super::{InlineImage, ProviderError, TextProvider, Turn};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini text provider.
pub struct GeminiTextProvider {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(settings: GeminiSettings) -> Self {
        Self::new_with_client(settings, Client::new())
    }

    pub fn new_with_client(settings: GeminiSettings, client: Client) -> Self {
        Self { settings, client }
    }

    fn build_request(turns: &[Turn]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: turns.iter().map(Content::from).collect(),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, turns: &[Turn]) -> Result<String, ProviderError> {
        let request = Self::build_request(turns);

        tracing::debug!(
            endpoint = %self.settings.endpoint_url,
            turn_count = turns.len(),
            has_image = turns.iter().any(|t| t.image.is_some()),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&self.settings.endpoint_url)
            .query(&[("key", self.settings.api_key())])
            .json(&request)
            .send()
            .await
            // The request URL carries the API key, so it must not reach the message.
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Gemini API returned an error status");
            return Err(ProviderError::Transport(match upstream_error_message(&body) {
                Some(msg) => format!("Gemini API error {}: {}", status, msg),
                None => format!("Gemini API error {}", status),
            }));
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %body, "Gemini response is not valid JSON");
            ProviderError::Transport(format!("Failed to parse API response as JSON: {}", e))
        })?;

        let api_response: GenerateContentResponse = serde_json::from_value(value)
            .map_err(|e| ProviderError::Format(format!("Unexpected response shape: {}", e)))?;

        extract_text(api_response)
    }
}

/// First part text of the first candidate; everything else is ignored.
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let candidates = response.candidates.unwrap_or_default();

    let Some(candidate) = candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!(" (prompt blocked: {})", r))
            .unwrap_or_default();
        return Err(ProviderError::Format(format!(
            "No response from Gemini API{}",
            reason
        )));
    };

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            ProviderError::Format(format!(
                "First candidate has no text part (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })
}

/// Pulls `error.message` out of a Google API error body.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    role: &'static str,
    parts: Vec<ContentPart>,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        let mut parts = vec![ContentPart::Text {
            text: turn.text.clone(),
        }];
        if let Some(image) = &turn.image {
            parts.push(ContentPart::InlineData {
                inline_data: InlineData::from(image),
            });
        }

        Content {
            role: turn.role.as_str(),
            parts,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl From<&InlineImage> for InlineData {
    fn from(image: &InlineImage) -> Self {
        InlineData {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
