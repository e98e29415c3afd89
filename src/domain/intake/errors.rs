//! Intake-specific error types.

use crate::domain::foundation::{CallSid, DomainError, ErrorCode};

use super::IntakeField;

/// Faults that can occur while handling one callback.
///
/// None of these ever reach the provider as an HTTP failure; each one is
/// turned into a spoken response by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// No usable speech arrived for the field being asked.
    RecognitionEmpty(IntakeField),
    /// The callback referenced a call with no stored record, or carried no
    /// call identifier at all.
    RecordMissing(Option<CallSid>),
    /// The store was unavailable or rejected the write.
    Persistence(String),
    /// The generative-text or transcription backend failed.
    Backend(String),
}

impl IntakeError {
    pub fn recognition_empty(field: IntakeField) -> Self {
        IntakeError::RecognitionEmpty(field)
    }
    pub fn record_missing(call_sid: Option<CallSid>) -> Self {
        IntakeError::RecordMissing(call_sid)
    }
    pub fn backend(message: impl Into<String>) -> Self {
        IntakeError::Backend(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            IntakeError::RecognitionEmpty(_) => ErrorCode::ValidationFailed,
            IntakeError::RecordMissing(_) => ErrorCode::CallRecordNotFound,
            IntakeError::Persistence(_) => ErrorCode::DatabaseError,
            IntakeError::Backend(_) => ErrorCode::AIProviderError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            IntakeError::RecognitionEmpty(field) => {
                format!("No speech recognized for {}", field.label())
            }
            IntakeError::RecordMissing(Some(sid)) => format!("No record for call {}", sid),
            IntakeError::RecordMissing(None) => "Callback carried no call identifier".to_string(),
            IntakeError::Persistence(msg) => format!("Persistence failure: {}", msg),
            IntakeError::Backend(msg) => format!("Backend failure: {}", msg),
        }
    }
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for IntakeError {}

impl From<DomainError> for IntakeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CallRecordNotFound => IntakeError::RecordMissing(None),
            ErrorCode::AIProviderError | ErrorCode::TranscriptionError => {
                IntakeError::Backend(err.message)
            }
            _ => IntakeError::Persistence(err.message),
        }
    }
}
