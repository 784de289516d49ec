//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Credential injected into every resolver under test. All mounted mocks
/// match on it, so a request that drops or mangles the key matches nothing.
pub const TEST_KEY: &str = "test-key";

/// Start a mock server that simulates the Gemini API
pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

/// JSON body shaped like a generateContent success carrying one command.
pub fn command_response(command: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": command }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    })
}

fn generate_path(model: &str) -> String {
    format!("/models/{model}:generateContent")
}

/// Mount a 200 generateContent response for one model.
pub async fn mount_generate(server: &MockServer, model: &str, command: &str) {
    Mock::given(method("POST"))
        .and(path(generate_path(model)))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(command_response(command)))
        .mount(server)
        .await;
}

/// Mount a fixed-status response with a plain-text body for one model.
pub async fn mount_generate_status(server: &MockServer, model: &str, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(generate_path(model)))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount a 200 response with an arbitrary JSON body for one model.
pub async fn mount_generate_json(server: &MockServer, model: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(generate_path(model)))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
