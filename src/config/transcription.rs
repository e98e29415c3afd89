//! Speech-to-text configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the recording transcription sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// API key; falls back to `ai.openai_api_key` when unset
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Spoken-language hint such as `en`
    pub language: Option<String>,

    /// Per-recording timeout in seconds, covering download and upload
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum recordings handled by one sweep
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,
}

impl TranscriptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The transcription key, or `fallback` when none is configured.
    pub fn api_key_or<'a>(&'a self, fallback: Option<&'a str>) -> Option<&'a str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .or(fallback)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.batch_limit == 0 {
            return Err(ValidationError::InvalidBatchLimit);
        }
        Ok(())
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            language: None,
            timeout_secs: default_timeout(),
            batch_limit: default_batch_limit(),
        }
    }
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_batch_limit() -> u32 {
    100
}
