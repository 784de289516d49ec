//! Suggestion resolution: one description in, one executable command out.
//!
//! The resolver walks [`FALLBACK_MODELS`] in priority order, issuing one
//! bounded request per candidate. A 404 means the candidate model does not
//! exist at the endpoint and is skipped outright; any other failure is
//! remembered and the walk continues, so a later candidate can still
//! succeed. Only when every candidate has failed does the most recent
//! non-404 failure surface, or a generic "no models available" error when
//! nothing but 404s were seen.

use askcmd_types::{ApiKey, FALLBACK_MODELS, ModelId};
use serde_json::Value;

use crate::gemini;

/// Terminal failure of one resolution attempt.
///
/// There is no automatic retry of the whole resolution, only fallback across
/// model candidates within the one attempt.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("GEMINI_API_KEY environment variable is not set")]
    MissingCredential,
    #[error("no models available")]
    ModelUnavailable,
    #[error("request to {model} failed: {detail}")]
    Transport { model: ModelId, detail: String },
    #[error("model {model} returned an unparseable response")]
    MalformedResponse { model: ModelId },
    #[error("model {model} returned no command text")]
    EmptyResponse { model: ModelId },
}

/// Why one candidate attempt did not produce a command.
///
/// `ModelNotFound` never becomes the final error while any other failure
/// was seen; everything else is carried in the accumulator.
enum AttemptError {
    ModelNotFound,
    Failed(SuggestError),
}

/// Resolves a natural-language description into a shell command via the
/// Gemini generateContent endpoint.
pub struct SuggestionResolver {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl SuggestionResolver {
    /// Resolver against the canonical endpoint with the hardened client and
    /// the standard per-request timeout.
    pub fn new(api_key: Option<ApiKey>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: crate::http_client_with_timeout(crate::REQUEST_TIMEOUT_SECS)?,
            base_url: crate::GEMINI_API_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Resolver with an injected client and endpoint, for stub servers.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<ApiKey>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Resolve `description` into a single raw command line.
    ///
    /// Callers must pass a non-blank description; the blank case is decided
    /// upstream without touching the resolver.
    pub async fn resolve(&self, description: &str) -> Result<String, SuggestError> {
        let Some(api_key) = &self.api_key else {
            return Err(SuggestError::MissingCredential);
        };

        let prompt = build_prompt(description);
        let body = gemini::request_body(&prompt);

        let mut last_error: Option<SuggestError> = None;
        for model in &FALLBACK_MODELS {
            match self.try_model(model, api_key, &body).await {
                Ok(command) => {
                    tracing::debug!(model = %model, "model produced a command");
                    return Ok(command);
                }
                Err(AttemptError::ModelNotFound) => {
                    tracing::debug!(model = %model, "model not available, trying next");
                }
                Err(AttemptError::Failed(err)) => {
                    tracing::warn!(model = %model, error = %err, "attempt failed, trying next");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(SuggestError::ModelUnavailable))
    }

    async fn try_model(
        &self,
        model: &ModelId,
        api_key: &ApiKey,
        body: &Value,
    ) -> Result<String, AttemptError> {
        let url = gemini::request_url(&self.base_url, model, api_key);
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // The URL embeds the credential; strip it before stringifying.
                AttemptError::Failed(SuggestError::Transport {
                    model: model.clone(),
                    detail: e.without_url().to_string(),
                })
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AttemptError::ModelNotFound);
        }
        if !status.is_success() {
            let detail = crate::read_capped_error_body(response).await;
            return Err(AttemptError::Failed(SuggestError::Transport {
                model: model.clone(),
                detail: format!("{status}: {detail}"),
            }));
        }

        let parsed: gemini::GenerateResponse = response.json().await.map_err(|_| {
            AttemptError::Failed(SuggestError::MalformedResponse {
                model: model.clone(),
            })
        })?;
        match gemini::first_candidate_text(parsed) {
            Some(text) => Ok(clean_command(&text)),
            None => Err(AttemptError::Failed(SuggestError::EmptyResponse {
                model: model.clone(),
            })),
        }
    }
}

/// Embed the description into the fixed instructional template.
///
/// The template states the assistant's role, repeats the description, and
/// demands the raw command alone, reinforced with two worked examples.
fn build_prompt(description: &str) -> String {
    format!(
        "You are a helpful assistant that suggests terminal commands based on user descriptions.\n\
         The user wants to: {description}\n\
         \n\
         Provide ONLY the command that should be executed, without any explanation, comments, or markdown formatting.\n\
         Just output the raw command that can be directly executed in a terminal.\n\
         \n\
         Example:\n\
         User: \"list all files in current directory\"\n\
         You: ls -la\n\
         \n\
         User: \"find all python files\"\n\
         You: find . -name \"*.py\"\n\
         \n\
         Now provide the command for: {description}"
    )
}

/// Trim the model's text and unwrap a surrounding markdown code fence.
fn clean_command(raw: &str) -> String {
    let trimmed = raw.trim();
    strip_code_fence(trimmed).trim().to_string()
}

/// Drop the first and last lines of a fenced block spanning more than two
/// lines; anything else passes through unchanged.
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") || text.lines().count() <= 2 {
        return text;
    }
    let (Some(first_newline), Some(last_newline)) = (text.find('\n'), text.rfind('\n')) else {
        return text;
    };
    &text[first_newline + 1..last_newline]
}
