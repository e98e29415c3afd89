//! Telephony provider configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::intake::DEFAULT_MAX_REPROMPTS;

/// How the service presents itself to the telephony provider.
#[derive(Debug, Clone, Deserialize)]
pub struct TelephonyConfig {
    /// Public URL the provider reaches this service at; every callback URL
    /// in a response document is built from it.
    pub base_url: String,

    /// Provider account identifier, used to fetch recordings
    pub account_sid: Option<String>,

    /// Provider auth token, used to verify webhook signatures and fetch
    /// recordings
    pub auth_token: Option<String>,

    /// Voice used for every spoken prompt
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Seconds of silence before a speech capture gives up
    #[serde(default = "default_gather_timeout")]
    pub gather_timeout_secs: u32,

    /// Failed attempts allowed per question before giving up
    #[serde(default = "default_max_reprompts")]
    pub max_reprompts: u32,

    /// Reject callbacks whose signature does not verify
    #[serde(default)]
    pub validate_signatures: bool,
}

impl TelephonyConfig {
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Account credentials for fetching recordings, when both are set.
    pub fn recording_credentials(&self) -> Option<(&str, &str)> {
        let account_sid = self.account_sid.as_deref().filter(|s| !s.is_empty())?;
        Some((account_sid, self.auth_token()?))
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("TELEPHONY__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.gather_timeout_secs == 0 || self.gather_timeout_secs > 60 {
            return Err(ValidationError::InvalidGatherTimeout);
        }
        if self.max_reprompts == 0 {
            return Err(ValidationError::InvalidRepromptLimit);
        }
        if self.validate_signatures && self.auth_token().is_none() {
            return Err(ValidationError::SignatureWithoutToken);
        }
        Ok(())
    }
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            account_sid: None,
            auth_token: None,
            voice: default_voice(),
            gather_timeout_secs: default_gather_timeout(),
            max_reprompts: default_max_reprompts(),
            validate_signatures: false,
        }
    }
}

fn default_voice() -> String {
    "alice".to_string()
}

fn default_gather_timeout() -> u32 {
    10
}

fn default_max_reprompts() -> u32 {
    DEFAULT_MAX_REPROMPTS
}
