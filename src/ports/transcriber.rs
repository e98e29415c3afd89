//! Transcriber Port - speech-to-text for stored call recordings.

use async_trait::async_trait;
use thiserror::Error;

/// Port for transcribing a recording by location.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Download and transcribe one recording.
    ///
    /// Returns `Ok(None)` when the audio contains no recognizable speech.
    async fn transcribe(&self, recording_url: &str) -> Result<Option<String>, TranscriptionError>;
}

/// Transcription failures.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// Recording could not be fetched from the provider.
    #[error("download failed: {0}")]
    Download(String),

    /// Speech-to-text backend rejected or failed the request.
    #[error("transcription backend failed: {0}")]
    Backend(String),

    /// Backend answered with something unparseable.
    #[error("parse error: {0}")]
    Parse(String),
}
