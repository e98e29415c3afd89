//! Recording Log Port - append-only list of recording locations.
//!
//! Every recording reported by the provider is appended here, independently
//! of the database. The transcription sweep replays this log to recover
//! recordings whose database write failed.

use async_trait::async_trait;
use thiserror::Error;

/// Port for the recording location log.
///
/// # Contract
///
/// - `append` adds exactly one line per call and never rewrites history
/// - `read_all` returns entries in append order, skipping blank lines
/// - a log that does not exist yet reads as empty
#[async_trait]
pub trait RecordingLog: Send + Sync {
    /// Append one recording location.
    async fn append(&self, recording_url: &str) -> Result<(), StorageError>;

    /// Read every logged recording location.
    async fn read_all(&self) -> Result<Vec<String>, StorageError>;
}

/// Errors from file-backed storage ports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refused to store a value.
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_log_is_object_safe() {
        fn _accepts_dyn(_log: &dyn RecordingLog) {}
    }

    #[test]
    fn io_errors_convert() {
        let err: StorageError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.to_string(), "I/O error: denied");
    }
}
