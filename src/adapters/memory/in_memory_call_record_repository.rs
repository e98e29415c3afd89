//! In-Memory Call Record Repository
//!
//! Stores call records in a process-local map. Useful for tests and local
//! development; it does not share state between processes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CallSid, DomainError, ErrorCode};
use crate::domain::intake::{CallRecord, IntakeField, SpeechAnswer};
use crate::ports::CallRecordRepository;

/// In-memory storage for call records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCallRecordRepository {
    records: Arc<RwLock<HashMap<CallSid, CallRecord>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemoryCallRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail with a database error (for fault tests).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every read fail with a database error (for fault tests).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Seeds a record directly.
    pub async fn insert(&self, record: CallRecord) {
        self.records
            .write()
            .await
            .insert(record.call_sid.clone(), record);
    }

    pub async fn get(&self, call_sid: &str) -> Option<CallRecord> {
        let sid = CallSid::new(call_sid).ok()?;
        self.records.read().await.get(&sid).cloned()
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    fn check_write(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("store unavailable"));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("store unavailable"));
        }
        Ok(())
    }

    async fn upsert<F>(&self, call_sid: &CallSid, apply: F) -> Result<CallRecord, DomainError>
    where
        F: FnOnce(&mut CallRecord),
    {
        self.check_write()?;
        let mut records = self.records.write().await;
        let record = records
            .entry(call_sid.clone())
            .or_insert_with(|| CallRecord::new(call_sid.clone()));
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl CallRecordRepository for InMemoryCallRecordRepository {
    async fn find_by_call_sid(&self, call_sid: &CallSid) -> Result<Option<CallRecord>, DomainError> {
        self.check_read()?;
        Ok(self.records.read().await.get(call_sid).cloned())
    }

    async fn record_answer(
        &self,
        call_sid: &CallSid,
        field: IntakeField,
        answer: &SpeechAnswer,
    ) -> Result<CallRecord, DomainError> {
        self.upsert(call_sid, |record| record.set_answer(field, answer.clone()))
            .await
    }

    async fn record_recording_url(
        &self,
        call_sid: &CallSid,
        recording_url: &str,
    ) -> Result<CallRecord, DomainError> {
        self.upsert(call_sid, |record| record.set_recording_url(recording_url))
            .await
    }

    async fn record_transcription(
        &self,
        call_sid: &CallSid,
        transcription: &str,
    ) -> Result<(), DomainError> {
        self.check_write()?;
        let mut records = self.records.write().await;
        let record = records.get_mut(call_sid).ok_or_else(|| {
            DomainError::new(
                ErrorCode::CallRecordNotFound,
                format!("Call record not found: {}", call_sid),
            )
        })?;
        record.set_transcription(transcription);
        Ok(())
    }

    async fn find_untranscribed(&self, limit: u32) -> Result<Vec<CallRecord>, DomainError> {
        self.check_read()?;
        let records = self.records.read().await;
        let mut pending: Vec<CallRecord> = records
            .values()
            .filter(|r| r.recording_url.is_some() && r.transcription.is_none())
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn find_by_recording_url(&self, url: &str) -> Result<Option<CallRecord>, DomainError> {
        self.check_read()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.recording_url.as_deref() == Some(url))
            .cloned())
    }
}
