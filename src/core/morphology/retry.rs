//! Bounded retry state machine for morphology requests.
//!
//! States: `Attempting` → (`Backoff` → `Attempting`)* → `Succeeded` | `Failed`.
//! Transitions are driven purely by the HTTP status of each attempt, which
//! keeps the policy testable without a network.

use std::time::Duration;

use reqwest::StatusCode;

use super::error::MorphologyError;

/// Default attempt budget (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry; doubles on each further retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Longest error body kept in error messages.
const MAX_MESSAGE_CHARS: usize = 300;

/// How an HTTP status steers the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// 429 or 5xx: wait and retry.
    Transient,
    /// 403: bad credential, stop.
    Credential,
    /// Anything else: stop and report.
    Fatal,
}

impl StatusClass {
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            StatusClass::Success
        } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            StatusClass::Transient
        } else if status == StatusCode::FORBIDDEN {
            StatusClass::Credential
        } else {
            StatusClass::Fatal
        }
    }
}

/// Result of one HTTP attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Response { status: StatusCode, body: String },
    Transport(reqwest::Error),
}

/// State of a single annotate request.
#[derive(Debug)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Succeeded(String),
    Failed(MorphologyError),
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting { attempt: 1 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded(_) | RetryState::Failed(_))
    }
}

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Delay after failed attempt `attempt` (1-based): 1, 2, 4, ... units.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1 << exponent)
    }

    /// Next state after `attempt` produced `outcome`.
    pub fn next_state(&self, attempt: u32, outcome: AttemptOutcome) -> RetryState {
        match outcome {
            AttemptOutcome::Response { status, body } => match StatusClass::of(status) {
                StatusClass::Success => RetryState::Succeeded(body),
                StatusClass::Credential => RetryState::Failed(MorphologyError::Credential {
                    message: error_message(&body),
                }),
                StatusClass::Fatal => RetryState::Failed(MorphologyError::Api {
                    status: status.as_u16(),
                    message: error_message(&body),
                }),
                StatusClass::Transient => self.retry_or_exhaust(
                    attempt,
                    Some(status.as_u16()),
                    error_message(&body),
                ),
            },
            AttemptOutcome::Transport(err) if err.is_timeout() || err.is_connect() => {
                self.retry_or_exhaust(attempt, None, err.to_string())
            }
            AttemptOutcome::Transport(err) => RetryState::Failed(MorphologyError::Http(err)),
        }
    }

    fn retry_or_exhaust(&self, attempt: u32, last_status: Option<u16>, message: String) -> RetryState {
        if attempt < self.max_attempts {
            RetryState::Backoff {
                attempt,
                delay: self.delay_for(attempt),
            }
        } else {
            RetryState::Failed(MorphologyError::RetriesExhausted {
                attempts: attempt,
                last_status,
                message,
            })
        }
    }
}

/// Pull `error.message` out of an API error body, falling back to the
/// (truncated) body itself.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string));

    match parsed {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().chars().take(MAX_MESSAGE_CHARS).collect(),
    }
}
