//! Mock provider for testing.
//!
//! Records every turn sequence it receives and answers from a script.

use super::{ProviderError, TextProvider, Turn};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Reply = Box<dyn Fn(&[Turn]) -> Result<String, ProviderError> + Send + Sync>;

/// Mock text provider for testing.
#[derive(Clone)]
pub struct MockTextProvider {
    reply: Arc<Reply>,
    calls: Arc<Mutex<Vec<Vec<Turn>>>>,
}

impl MockTextProvider {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::with_reply(move |_| Ok(text.clone()))
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_reply(move |_| Err(error.clone()))
    }

    /// Echo the text of the last turn back, prefixed with "echo: ".
    pub fn echo() -> Self {
        Self::with_reply(|turns| {
            Ok(format!(
                "echo: {}",
                turns.last().map(|t| t.text.as_str()).unwrap_or_default()
            ))
        })
    }

    pub fn with_reply<F>(reply: F) -> Self
    where
        F: Fn(&[Turn]) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            reply: Arc::new(Box::new(reply)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Turn sequences received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, turns: &[Turn]) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(turns.to_vec());
        }
        (self.reply)(turns)
    }
}
