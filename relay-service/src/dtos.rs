use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. `message` must be present but may be empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeResponse {
    pub description: String,
}
