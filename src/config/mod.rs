//! Application configuration module
//!
//! Configuration is loaded from environment variables with the
//! `CALL_INTAKE` prefix; nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use call_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod recording;
mod server;
mod telephony;
mod transcription;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use recording::RecordingConfig;
pub use server::{Environment, ServerConfig};
pub use telephony::TelephonyConfig;
pub use transcription::TranscriptionConfig;

use serde::Deserialize;
use std::time::Duration;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub telephony: TelephonyConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub recording: RecordingConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `CALL_INTAKE__SERVER__PORT=8080` into `server.port`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into their expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CALL_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate everything the webhook server needs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.telephony.validate(self.is_production())?;
        self.ai.validate()?;
        self.recording.validate()?;

        // The handoff must finish before the request timeout cuts it off.
        let ai_latency = self.ai.worst_case_latency();
        let request_timeout = Duration::from_secs(self.server.request_timeout_secs);
        if ai_latency >= request_timeout {
            return Err(ValidationError::AiExceedsRequestTimeout {
                ai_secs: ai_latency.as_secs(),
                request_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Validate the sections used by the transcription sweep.
    pub fn validate_for_transcription(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.recording.validate()?;
        self.transcription.validate()?;
        if self.transcription_api_key().is_none() {
            return Err(ValidationError::MissingRequired("TRANSCRIPTION__API_KEY"));
        }
        Ok(())
    }

    /// Key for the speech-to-text backend.
    pub fn transcription_api_key(&self) -> Option<&str> {
        self.transcription.api_key_or(self.ai.api_key())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CALL_INTAKE__DATABASE__URL", "postgresql://test@localhost/calls");
        env::set_var("CALL_INTAKE__TELEPHONY__BASE_URL", "https://calls.example.com");
        env::set_var("CALL_INTAKE__AI__OPENAI_API_KEY", "sk-xxx");
    }

    fn clear_env() {
        for key in [
            "CALL_INTAKE__DATABASE__URL",
            "CALL_INTAKE__TELEPHONY__BASE_URL",
            "CALL_INTAKE__TELEPHONY__MAX_REPROMPTS",
            "CALL_INTAKE__TELEPHONY__VALIDATE_SIGNATURES",
            "CALL_INTAKE__AI__OPENAI_API_KEY",
            "CALL_INTAKE__SERVER__PORT",
            "CALL_INTAKE__SERVER__ENVIRONMENT",
            "CALL_INTAKE__RECORDING__LOG_PATH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/calls");
        assert_eq!(config.telephony.base_url, "https://calls.example.com");
        assert_eq!(config.telephony.voice, "alice");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CALL_INTAKE__SERVER__PORT", "3000");
        env::set_var("CALL_INTAKE__TELEPHONY__MAX_REPROMPTS", "5");
        env::set_var("CALL_INTAKE__RECORDING__LOG_PATH", "/var/lib/calls/urls.txt");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telephony.max_reprompts, 5);
        assert_eq!(
            config.recording.log_path,
            std::path::PathBuf::from("/var/lib/calls/urls.txt")
        );
    }

    #[test]
    fn test_missing_telephony_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("CALL_INTAKE__TELEPHONY__BASE_URL");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_signature_validation_without_token_is_invalid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CALL_INTAKE__TELEPHONY__VALIDATE_SIGNATURES", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::SignatureWithoutToken)
        ));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CALL_INTAKE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_transcription_key_falls_back_to_ai_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.transcription_api_key(), Some("sk-xxx"));
        assert!(config.validate_for_transcription().is_ok());
    }

    #[test]
    fn test_ai_latency_must_fit_request_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let mut config = result.unwrap();
        assert!(config.validate().is_ok());

        // 2 attempts of 20s plus a 1s backoff
        config.ai.timeout_secs = 20;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::AiExceedsRequestTimeout {
                ai_secs: 41,
                request_secs: 30
            })
        ));

        config.server.request_timeout_secs = 60;
        assert!(config.validate().is_ok());
    }
}
