//! Call record repository port.
//!
//! Defines the contract for persisting per-call intake state. Every dialog
//! step reads and writes through this port, so any process instance can
//! serve any callback.
//!
//! # Design
//!
//! - **Field-scoped writes**: each write touches one column and leaves the
//!   rest of the record alone
//! - **Upsert semantics**: the first write for a call creates its record
//! - **Last write wins**: re-submitting a step overwrites that field

use async_trait::async_trait;

use crate::domain::foundation::{CallSid, DomainError};
use crate::domain::intake::{CallRecord, IntakeField, SpeechAnswer};

/// Repository port for call records.
#[async_trait]
pub trait CallRecordRepository: Send + Sync {
    /// Find the record for a call.
    ///
    /// Returns `None` if the call has never been written.
    async fn find_by_call_sid(&self, call_sid: &CallSid) -> Result<Option<CallRecord>, DomainError>;

    /// Store one intake answer, creating the record if needed.
    ///
    /// Returns the record as it stands after the write.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn record_answer(
        &self,
        call_sid: &CallSid,
        field: IntakeField,
        answer: &SpeechAnswer,
    ) -> Result<CallRecord, DomainError>;

    /// Store the recording location for a call, creating the record if needed.
    async fn record_recording_url(
        &self,
        call_sid: &CallSid,
        recording_url: &str,
    ) -> Result<CallRecord, DomainError>;

    /// Store the transcript for a call.
    ///
    /// # Errors
    ///
    /// - `CallRecordNotFound` if the call has no record
    /// - `DatabaseError` on persistence failure
    async fn record_transcription(
        &self,
        call_sid: &CallSid,
        transcription: &str,
    ) -> Result<(), DomainError>;

    /// Records with a recording location but no transcript, oldest first.
    async fn find_untranscribed(&self, limit: u32) -> Result<Vec<CallRecord>, DomainError>;

    /// Find the record holding a recording location.
    async fn find_by_recording_url(&self, url: &str) -> Result<Option<CallRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_record_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CallRecordRepository) {}
    }
}
