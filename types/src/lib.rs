//! Core domain types shared across the askcmd workspace.
//!
//! This crate holds the vocabulary the other crates speak: the API
//! credential, model identifiers and their fallback order, the outcome of an
//! input session, and sanitization of text that originates outside the
//! program. It deliberately performs no IO and spawns nothing.

use std::borrow::Cow;

mod sanitize;

pub use sanitize::{sanitize_line, sanitize_text};

// ============================================================================
// API Key
// ============================================================================

/// Gemini API credential.
///
/// `Debug` is manually implemented to redact the key value, preventing
/// accidental credential disclosure in logs or error messages.
#[derive(Clone)]
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

impl ApiKey {
    /// Environment variable the credential is read from.
    pub const ENV_VAR: &'static str = "GEMINI_API_KEY";

    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Model Identifiers
// ============================================================================

/// Identifier of one remote generation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId(Cow<'static, str>);

impl ModelId {
    #[must_use]
    pub const fn known(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Models tried in priority order; the first success wins.
///
/// Fixed at build time. 404 on an earlier entry falls through to the next.
pub const FALLBACK_MODELS: [ModelId; 2] = [
    ModelId::known("gemini-2.0-flash-exp"),
    ModelId::known("gemini-1.5-flash"),
];

// ============================================================================
// Session Outcome
// ============================================================================

/// How an input session ended.
///
/// Produced exactly once per session, immediately before its control loop
/// exits. `Committed` carries the buffer content at the moment Enter was
/// pressed; `Cancelled` carries nothing regardless of buffer content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed(String),
    Cancelled,
}

impl SessionOutcome {
    /// The committed text, if the session committed.
    #[must_use]
    pub fn into_committed(self) -> Option<String> {
        match self {
            SessionOutcome::Committed(text) => Some(text),
            SessionOutcome::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, SessionOutcome::Cancelled)
    }
}
