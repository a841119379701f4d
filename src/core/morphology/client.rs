//! HTTP client for the remote morphology model.

use std::collections::BTreeMap;

use reqwest::Client;
use serde_json::Value;

use super::error::{MorphologyError, Result};
use super::prompt::request_body;
use super::retry::{AttemptOutcome, RetryPolicy, RetryState};
use super::types::MorphologyRecord;
use crate::config::MorphologyConfig;
use crate::core::language::Language;

/// Annotates word lists through a `generateContent`-style JSON API.
///
/// Endpoint and key come from [`MorphologyConfig`]; construction fails when
/// either is missing so no unauthenticated request is ever sent.
#[derive(Clone)]
pub struct MorphologyClient {
    endpoint: String,
    api_key: String,
    client: Client,
    policy: RetryPolicy,
}

impl std::fmt::Debug for MorphologyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphologyClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("policy", &self.policy)
            .finish()
    }
}

impl MorphologyClient {
    pub fn new(config: &MorphologyConfig) -> Result<Self> {
        let (endpoint, api_key) = config.credentials()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
            policy: config.retry_policy(),
        })
    }

    /// Annotate `words` as `language`.
    ///
    /// An empty list returns immediately without touching the network.
    /// Rate limits and server errors are retried per the [`RetryPolicy`];
    /// everything else fails on the first attempt.
    pub async fn annotate(
        &self,
        words: &[String],
        language: Language,
    ) -> Result<Vec<MorphologyRecord>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let body = request_body(words, language);
        tracing::info!(
            words = words.len(),
            language = language.label(),
            "Requesting morphology annotations"
        );

        let mut state = RetryState::start();
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    tracing::debug!(attempt, max = self.policy.max_attempts, "Sending morphology request");
                    let outcome = self.send_once(&body).await;
                    self.policy.next_state(attempt, outcome)
                }
                RetryState::Backoff { attempt, delay } => {
                    tracing::warn!(
                        attempt,
                        max = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Morphology API busy, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    RetryState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                RetryState::Succeeded(raw) => {
                    let records = parse_response(&raw)?;
                    tracing::info!(records = records.len(), "Morphology annotations received");
                    return Ok(records);
                }
                RetryState::Failed(err) => {
                    tracing::error!(error = %err, "Morphology request failed");
                    return Err(err);
                }
            };
        }
    }

    /// Like [`annotate`](Self::annotate), keyed by the word each record
    /// names. Later records for the same word replace earlier ones.
    pub async fn annotate_map(
        &self,
        words: &[String],
        language: Language,
    ) -> Result<BTreeMap<String, MorphologyRecord>> {
        let records = self.annotate(words, language).await?;
        Ok(records
            .into_iter()
            .map(|record| (record.word.clone(), record))
            .collect())
    }

    async fn send_once(&self, body: &Value) -> AttemptOutcome {
        let result = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => return AttemptOutcome::Transport(e),
        };

        let status = resp.status();
        match resp.text().await {
            Ok(body) => AttemptOutcome::Response { status, body },
            Err(e) => AttemptOutcome::Transport(e),
        }
    }
}

/// Unwrap `candidates[0].content.parts[0].text` and parse it as records.
pub fn parse_response(raw: &str) -> Result<Vec<MorphologyRecord>> {
    let envelope: Value = serde_json::from_str(raw)
        .map_err(|e| MorphologyError::format(format!("response is not JSON: {e}"), raw))?;

    let text = envelope["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .and_then(|parts| parts.first())
        .and_then(|p| p["text"].as_str())
        .ok_or_else(|| {
            MorphologyError::format("missing candidates[0].content.parts[0].text", raw)
        })?;

    serde_json::from_str::<Vec<MorphologyRecord>>(text).map_err(|e| {
        MorphologyError::format(format!("embedded payload is not a record array: {e}"), text)
    })
}
