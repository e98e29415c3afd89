//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Public base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Public base URL must use HTTPS in production")]
    BaseUrlMustBeHttps,

    #[error("Gather timeout must be between 1 and 60 seconds")]
    InvalidGatherTimeout,

    #[error("Re-prompt limit must be at least 1")]
    InvalidRepromptLimit,

    #[error("Signature validation requires an auth token")]
    SignatureWithoutToken,

    #[error("Transcription batch limit must be at least 1")]
    InvalidBatchLimit,

    #[error("AI max_tokens must be at least 1")]
    InvalidMaxTokens,

    #[error("AI temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("AI worst-case latency of {ai_secs}s does not fit the {request_secs}s request timeout")]
    AiExceedsRequestTimeout { ai_secs: u64, request_secs: u64 },
}
