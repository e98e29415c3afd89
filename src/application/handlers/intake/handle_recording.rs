//! HandleRecordingHandler - stores the location of a finished call recording.

use std::sync::Arc;

use crate::domain::foundation::CallSid;
use crate::domain::intake::IntakeError;
use crate::ports::{CallRecordRepository, RecordingLog};

#[derive(Debug, Clone, Default)]
pub struct HandleRecordingCommand {
    pub call_sid: Option<CallSid>,
    pub recording_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRecordingResult {
    /// A required field was missing; nothing was written.
    Ignored,
    Recorded { persisted: bool, logged: bool },
}

/// Writes the recording location to the store and to the recovery log.
///
/// The two writes are independent: either may fail without affecting the
/// other, and neither failure reaches the provider.
pub struct HandleRecordingHandler {
    repository: Arc<dyn CallRecordRepository>,
    recording_log: Arc<dyn RecordingLog>,
}

impl HandleRecordingHandler {
    pub fn new(
        repository: Arc<dyn CallRecordRepository>,
        recording_log: Arc<dyn RecordingLog>,
    ) -> Self {
        Self {
            repository,
            recording_log,
        }
    }

    pub async fn handle(&self, cmd: HandleRecordingCommand) -> HandleRecordingResult {
        let recording_url = cmd
            .recording_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());

        let (Some(call_sid), Some(recording_url)) = (cmd.call_sid, recording_url) else {
            tracing::warn!("Recording callback missing CallSid or RecordingUrl");
            return HandleRecordingResult::Ignored;
        };

        let persisted = match self
            .repository
            .record_recording_url(&call_sid, recording_url)
            .await
        {
            Ok(_) => {
                tracing::info!(call_sid = %call_sid, recording_url, "Recording location stored");
                true
            }
            Err(e) => {
                let err = IntakeError::from(e);
                tracing::error!(call_sid = %call_sid, error = %err, "Failed to store recording location");
                false
            }
        };

        let logged = match self.recording_log.append(recording_url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(call_sid = %call_sid, error = %e, "Failed to append recording log");
                false
            }
        };

        HandleRecordingResult::Recorded { persisted, logged }
    }
}
