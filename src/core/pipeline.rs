//! Search Pipeline
//!
//! Request boundary between the UI and the core: validates input, runs the
//! extractor, optionally labels the language and annotates the words, and
//! folds every failure into a user-facing message. Nothing here panics or
//! returns an error; a failed annotation degrades to an empty map.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::MorphologyConfig;
use crate::core::extractor::{extract_words, tokenize};
use crate::core::language::{detect_language, Language};
use crate::core::morphology::{MorphologyClient, MorphologyError, MorphologyRecord};

// ============================================================================
// Request / Outcome Types
// ============================================================================

/// One user-triggered search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub text: String,
    pub substring: String,
    /// Also send the matches to the morphology model.
    pub annotate: bool,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, substring: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            substring: substring.into(),
            annotate: false,
        }
    }

    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }
}

/// Which input the user left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMissing {
    Text,
    Substring,
}

/// Severity of a [`SearchMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Warning,
    Error,
}

/// Something the UI must tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    InputMissing(InputMissing),
    NoMatches { substring: String },
    /// Annotation failed; `raw` carries the response for format errors.
    Annotation {
        level: MessageLevel,
        message: String,
        raw: Option<String>,
    },
}

impl SearchMessage {
    pub fn level(&self) -> MessageLevel {
        match self {
            SearchMessage::InputMissing(_) | SearchMessage::NoMatches { .. } => MessageLevel::Warning,
            SearchMessage::Annotation { level, .. } => *level,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            SearchMessage::Annotation { raw, .. } => raw.as_deref(),
            _ => None,
        }
    }

    fn from_error(err: &MorphologyError) -> Self {
        // Exhausted retries is a recoverable state; everything else is an error.
        let level = if err.is_transient() {
            MessageLevel::Warning
        } else {
            MessageLevel::Error
        };
        let message = match err {
            MorphologyError::MissingConfig(_) => format!("Annotation unavailable. {err}"),
            MorphologyError::RetriesExhausted { .. } => {
                format!("The morphology service is busy, try again later. {err}")
            }
            _ => err.to_string(),
        };
        SearchMessage::Annotation {
            level,
            message,
            raw: err.raw_response().map(str::to_string),
        }
    }
}

impl fmt::Display for SearchMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMessage::InputMissing(InputMissing::Text) => {
                f.write_str("Please enter some text to analyze.")
            }
            SearchMessage::InputMissing(InputMissing::Substring) => {
                f.write_str("Please enter the letters to search for.")
            }
            SearchMessage::NoMatches { substring } => {
                write!(f, "No words containing '{substring}' were found in the text.")
            }
            SearchMessage::Annotation { message, .. } => f.write_str(message),
        }
    }
}

/// Everything the UI renders for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub substring: String,
    /// Unique matches, sorted by code point.
    pub words: Vec<String>,
    pub tokens_scanned: usize,
    /// Set when annotation was requested for a non-empty match list.
    pub language: Option<Language>,
    /// Keyed by the word each record names; may miss words or hold extras.
    pub annotations: BTreeMap<String, MorphologyRecord>,
    pub messages: Vec<SearchMessage>,
}

impl SearchOutcome {
    fn with_message(substring: &str, message: SearchMessage) -> Self {
        Self {
            substring: substring.to_string(),
            messages: vec![message],
            ..Self::default()
        }
    }

    /// "Found N unique word(s) containing 'S'", or `None` without matches.
    pub fn summary(&self) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        Some(format!(
            "Found {} unique word(s) containing '{}'",
            self.words.len(),
            self.substring
        ))
    }

    pub fn annotation_for(&self, word: &str) -> Option<&MorphologyRecord> {
        self.annotations.get(word)
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level() == MessageLevel::Error)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Runs extraction and (optionally) annotation for search requests.
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    client: Option<MorphologyClient>,
    /// Why `client` is absent, reported when annotation is requested.
    unavailable: Option<String>,
}

impl SearchPipeline {
    /// Build from configuration. A missing endpoint or key does not fail
    /// here; it is reported the first time annotation is requested.
    pub fn new(config: &MorphologyConfig) -> Self {
        match MorphologyClient::new(config) {
            Ok(client) => Self::with_client(client),
            Err(e) => {
                log::warn!("Morphology client disabled: {e}");
                Self {
                    client: None,
                    unavailable: Some(e.to_string()),
                }
            }
        }
    }

    pub fn with_client(client: MorphologyClient) -> Self {
        Self {
            client: Some(client),
            unavailable: None,
        }
    }

    pub fn can_annotate(&self) -> bool {
        self.client.is_some()
    }

    pub async fn run(&self, request: SearchRequest) -> SearchOutcome {
        let SearchRequest {
            text,
            substring,
            annotate,
        } = request;

        // Whitespace-only input is reported as missing, not as a search
        // with no matches.
        if text.trim().is_empty() {
            return SearchOutcome::with_message(&substring, SearchMessage::InputMissing(InputMissing::Text));
        }
        if substring.trim().is_empty() {
            return SearchOutcome::with_message(
                &substring,
                SearchMessage::InputMissing(InputMissing::Substring),
            );
        }

        let words = extract_words(&text, &substring);
        let mut outcome = SearchOutcome {
            substring: substring.clone(),
            tokens_scanned: tokenize(&text).count(),
            ..SearchOutcome::default()
        };
        log::info!(
            "Search for {:?}: {} match(es) in {} token(s)",
            substring,
            words.len(),
            outcome.tokens_scanned
        );

        if words.is_empty() {
            outcome.messages.push(SearchMessage::NoMatches { substring });
            return outcome;
        }

        if annotate {
            let language = detect_language(&text);
            outcome.language = Some(language);
            match self.annotate(&words, language).await {
                Ok(annotations) => outcome.annotations = annotations,
                Err(message) => outcome.messages.push(message),
            }
        }

        outcome.words = words;
        outcome
    }

    async fn annotate(
        &self,
        words: &[String],
        language: Language,
    ) -> Result<BTreeMap<String, MorphologyRecord>, SearchMessage> {
        let Some(client) = &self.client else {
            let reason = self
                .unavailable
                .as_deref()
                .unwrap_or("morphology client is not configured");
            return Err(SearchMessage::Annotation {
                level: MessageLevel::Error,
                message: format!("Annotation unavailable. {reason}"),
                raw: None,
            });
        };

        client
            .annotate_map(words, language)
            .await
            .map_err(|e| SearchMessage::from_error(&e))
    }
}
