//! Gemini API client and command suggestion resolution.
//!
//! # Architecture
//!
//! - [`SuggestionResolver`] - walks the fixed model fallback list, one
//!   request per candidate, and aggregates failures into a single
//!   [`SuggestError`]
//! - [`gemini`] - request URL/body assembly and typed response parsing for
//!   the generateContent API
//!
//! # Credentials
//!
//! The API key is injected at construction time, never read from the
//! environment here. The key travels in the request URL's `key` query
//! parameter, so request URLs are never logged; log lines carry the model
//! identifier only.

use std::time::Duration;

pub mod gemini;
mod resolve;

pub use askcmd_types;
pub use resolve::{SuggestError, SuggestionResolver};

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Total per-request budget, connection included.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
}

/// Build a client whose every request is bounded by a total timeout.
pub fn http_client_with_timeout(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Read an error response body, capped so a hostile or broken server cannot
/// balloon a diagnostic string.
pub async fn read_capped_error_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    while let Ok(Some(chunk)) = response.chunk().await {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
