//! Scripted transcriber for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{Transcriber, TranscriptionError};

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Silence,
    Failure(String),
}

/// Transcriber that answers from a per-URL script.
///
/// Unscripted URLs transcribe as silence.
#[derive(Debug, Clone, Default)]
pub struct MockTranscriber {
    script: Arc<Mutex<HashMap<String, Scripted>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        lock(&self.script).insert(url.into(), Scripted::Text(text.into()));
        self
    }

    pub fn with_silence(self, url: impl Into<String>) -> Self {
        lock(&self.script).insert(url.into(), Scripted::Silence);
        self
    }

    pub fn with_failure(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        lock(&self.script).insert(url.into(), Scripted::Failure(message.into()));
        self
    }

    /// URLs transcribed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, recording_url: &str) -> Result<Option<String>, TranscriptionError> {
        lock(&self.calls).push(recording_url.to_string());

        match lock(&self.script).get(recording_url).cloned() {
            Some(Scripted::Text(text)) => Ok(Some(text)),
            Some(Scripted::Failure(message)) => Err(TranscriptionError::Backend(message)),
            Some(Scripted::Silence) | None => Ok(None),
        }
    }
}
