//! Recording storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where recording locations and transcripts are kept on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// Append-only log of every recording URL received
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Directory receiving `{recording_sid}_transcription.txt` files
    #[serde(default = "default_transcript_dir")]
    pub transcript_dir: PathBuf,
}

impl RecordingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("RECORDING__LOG_PATH"));
        }
        if self.transcript_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("RECORDING__TRANSCRIPT_DIR"));
        }
        Ok(())
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            transcript_dir: default_transcript_dir(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from("recording_urls.txt")
}

fn default_transcript_dir() -> PathBuf {
    PathBuf::from("transcripts")
}
