//! Gemini generateContent wire format.
//!
//! Requests address `{base}/models/{model}:generateContent` with the API key
//! in the `key` query parameter and carry a single-turn body:
//!
//! ```json
//! {"contents": [{"parts": [{"text": "..."}]}]}
//! ```
//!
//! Successful responses carry `candidates[0].content.parts[0].text`; every
//! field along that path is optional on the wire, so the response types make
//! each level explicit rather than trusting the server shape.

use askcmd_types::{ApiKey, ModelId};
use serde::Deserialize;
use serde_json::{Value, json};

#[must_use]
pub fn request_url(base: &str, model: &ModelId, api_key: &ApiKey) -> String {
    format!(
        "{base}/models/{model}:generateContent?key={key}",
        model = model.as_str(),
        key = api_key.as_str()
    )
}

#[must_use]
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{
                "text": prompt
            }]
        }]
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Text of the first part of the first candidate, the only slot the
/// suggestion protocol reads.
#[must_use]
pub fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}
