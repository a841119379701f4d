//! Error types for the morphology client.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`MorphologyError`].
pub type Result<T> = std::result::Result<T, MorphologyError>;

/// Errors raised while annotating words with the remote model.
#[derive(Debug, Error, Diagnostic)]
pub enum MorphologyError {
    /// Endpoint or API key not configured.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(wordsift::morphology::config),
        help("set WORDSIFT_MORPHOLOGY__ENDPOINT and WORDSIFT_MORPHOLOGY__API_KEY, or the [morphology] table in config.toml")
    )]
    MissingConfig(String),

    /// The API rejected the credential (HTTP 403).
    #[error("Credential rejected by the morphology API: {message}")]
    #[diagnostic(
        code(wordsift::morphology::credential),
        help("check that the API key is valid and enabled for this endpoint")
    )]
    Credential { message: String },

    /// Rate limit or server errors persisted through every attempt.
    #[error("Morphology API still failing after {attempts} attempt(s): {message}")]
    #[diagnostic(code(wordsift::morphology::exhausted))]
    RetriesExhausted {
        attempts: u32,
        last_status: Option<u16>,
        message: String,
    },

    /// Non-retryable HTTP error status.
    #[error("Morphology API error ({status}): {message}")]
    #[diagnostic(code(wordsift::morphology::api))]
    Api { status: u16, message: String },

    /// The response envelope or its embedded JSON did not match the schema.
    #[error("Unexpected response format: {reason}")]
    #[diagnostic(code(wordsift::morphology::format))]
    ResponseFormat { reason: String, raw: String },

    /// Transport failure outside the retry loop.
    #[error("HTTP error: {0}")]
    #[diagnostic(code(wordsift::morphology::http))]
    Http(#[from] reqwest::Error),
}

impl MorphologyError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        MorphologyError::MissingConfig(msg.into())
    }

    /// Create a response format error carrying the raw payload.
    pub fn format(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        MorphologyError::ResponseFormat {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Whether the failure came from rate limiting or server errors.
    pub fn is_transient(&self) -> bool {
        matches!(self, MorphologyError::RetriesExhausted { .. })
    }

    /// Whether the credential was rejected or missing.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            MorphologyError::Credential { .. } | MorphologyError::MissingConfig(_)
        )
    }

    /// HTTP status code, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            MorphologyError::Credential { .. } => Some(403),
            MorphologyError::RetriesExhausted { last_status, .. } => *last_status,
            MorphologyError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response text, for format errors.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            MorphologyError::ResponseFormat { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }
}
