use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::core::morphology::{MorphologyError, RetryPolicy};

/// Prefix for environment overrides, e.g. `WORDSIFT_MORPHOLOGY__API_KEY`.
pub const ENV_PREFIX: &str = "WORDSIFT_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub morphology: MorphologyConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Start with morphology annotation switched on.
    pub annotate_by_default: bool,
}

/// Remote morphology API configuration.
///
/// Endpoint and key have no built-in defaults; both must come from the
/// config file or the environment.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    /// Full `generateContent` URL, model included.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Attempt budget per request (first try included).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub initial_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            annotate_by_default: false,
        }
    }
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            max_attempts: 3,
            initial_backoff_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for MorphologyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphologyConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_attempts", &self.max_attempts)
            .field("initial_backoff_ms", &self.initial_backoff_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl MorphologyConfig {
    /// Trimmed `(endpoint, api_key)`, or a configuration error naming the
    /// first missing value.
    pub fn credentials(&self) -> Result<(String, String), MorphologyError> {
        let endpoint = non_blank(&self.endpoint)
            .ok_or_else(|| MorphologyError::config("morphology endpoint is not set"))?;
        let api_key = non_blank(&self.api_key)
            .ok_or_else(|| MorphologyError::config("morphology API key is not set"))?;
        Ok((endpoint, api_key))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Per-request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AppConfig {
    /// Load configuration from `~/.config/wordsift/config.toml` plus
    /// `WORDSIFT_*` environment overrides.
    /// Returns `Default` if the sources cannot be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config (file: {})", config_path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config from {}: {e} (using defaults)",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Layer defaults, the TOML file at `path` (if present), then the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms.max(1))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("wordsift").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
