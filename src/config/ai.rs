//! Assistant backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::handlers::intake::{AssistantSettings, DEFAULT_SYSTEM_PROMPT};

/// OpenAI chat-completion settings used for the assistant handoff.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// API root, overridable for proxies and tests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Instruction sent ahead of the caller's introduction
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// First retry delay in milliseconds; doubles on each retry
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,

    /// Reply length cap in tokens
    pub max_tokens: Option<u32>,

    /// Sampling temperature, 0.0 to 2.0
    pub temperature: Option<f32>,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Longest a handoff can wait on the backend: every attempt timing out,
    /// plus the backoff sleeps between them.
    pub fn worst_case_latency(&self) -> Duration {
        let attempts = self.timeout().saturating_mul(self.max_retries.saturating_add(1));
        let backoff_units = 1u32
            .checked_shl(self.max_retries)
            .map_or(u32::MAX, |n| n - 1);
        attempts.saturating_add(self.retry_base_delay().saturating_mul(backoff_units))
    }

    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// The API key, when one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tokens == Some(0) {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            max_tokens: None,
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

// The reply must come back inside one webhook round trip.
fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    1
}

fn default_retry_base_delay() -> u64 {
    1000
}
