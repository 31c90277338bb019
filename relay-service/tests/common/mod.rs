#![allow(dead_code)]

use axum::response::Response;
use http_body_util::BodyExt;
use relay_service::config::RelayConfig;
use relay_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

/// Relay configuration pointing at `endpoint_url`, with `extra` variables layered on top.
pub fn test_config(endpoint_url: &str, extra: &[(&str, &str)]) -> RelayConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("GEMINI_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("GEMINI_API_URL".to_string(), endpoint_url.to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    let common = CoreConfig {
        port: 0, // Random port for testing
        ..CoreConfig::default()
    };

    RelayConfig::load_with(common, |key| vars.get(key).cloned())
        .expect("Failed to build test configuration")
}

pub fn upstream_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), GENERATE_PATH)
}

/// Minimal successful `generateContent` body.
pub fn candidates(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the real application (Gemini provider) against a fake upstream.
    pub async fn spawn(server: &MockServer) -> Self {
        Self::spawn_with(test_config(&upstream_url(server), &[])).await
    }

    pub async fn spawn_with(config: RelayConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/chat", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_image(&self, bytes: Vec<u8>, mime: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes)
                .file_name("upload.bin")
                .mime_str(mime)
                .expect("Invalid MIME type"),
        );

        self.client
            .post(format!("{}/describe-image", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
