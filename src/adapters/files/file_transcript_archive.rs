//! File-based Transcript Archive Adapter
//!
//! Writes each transcript to `{base_path}/{recording_sid}_transcription.txt`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{StorageError, TranscriptArchive};

#[derive(Debug, Clone)]
pub struct FileTranscriptArchive {
    base_path: PathBuf,
}

impl FileTranscriptArchive {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn transcript_path(&self, recording_sid: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_transcription.txt", recording_sid))
    }
}

fn checked_sid(recording_sid: &str) -> Result<&str, StorageError> {
    let valid = !recording_sid.is_empty()
        && recording_sid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(recording_sid)
    } else {
        Err(StorageError::InvalidEntry(format!(
            "unusable recording identifier: {:?}",
            recording_sid
        )))
    }
}

#[async_trait]
impl TranscriptArchive for FileTranscriptArchive {
    async fn store(&self, recording_sid: &str, transcript: &str) -> Result<(), StorageError> {
        let sid = checked_sid(recording_sid)?;
        fs::create_dir_all(&self.base_path).await?;
        fs::write(self.transcript_path(sid), transcript).await?;
        Ok(())
    }

    async fn contains(&self, recording_sid: &str) -> Result<bool, StorageError> {
        let sid = checked_sid(recording_sid)?;
        Ok(fs::try_exists(self.transcript_path(sid)).await?)
    }
}
