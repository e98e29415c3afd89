//! File-based Recording Log Adapter
//!
//! Appends one recording location per line to a plain text file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::ports::{RecordingLog, StorageError};

/// Line-per-entry recording log on local disk.
#[derive(Debug)]
pub struct FileRecordingLog {
    path: PathBuf,
    // Serializes appends from concurrent callbacks in this process.
    write_lock: Mutex<()>,
}

impl FileRecordingLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordingLog for FileRecordingLog {
    async fn append(&self, recording_url: &str) -> Result<(), StorageError> {
        let entry = recording_url.trim();
        if entry.is_empty() || entry.contains(['\n', '\r']) {
            return Err(StorageError::InvalidEntry(format!(
                "not a single-line recording location: {:?}",
                recording_url
            )));
        }

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", entry).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<String>, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}
