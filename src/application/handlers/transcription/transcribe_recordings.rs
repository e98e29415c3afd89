//! TranscribeRecordingsHandler - one sweep over recordings without a transcript.
//!
//! Candidates come from two places: store records with a recording location
//! but no transcript, and the recovery log (which also covers recordings
//! whose store write failed). Each location is processed once per sweep,
//! sequentially. A failure on one recording never stops the sweep.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::foundation::CallSid;
use crate::ports::{
    recording_sid, CallRecordRepository, RecordingLog, TranscriptArchive, Transcriber,
};

#[derive(Debug, Clone, Copy)]
pub struct TranscribeRecordingsCommand {
    /// Maximum recordings to attempt in this sweep.
    pub limit: u32,
}

/// Counts for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscriptionSummary {
    pub attempted: u32,
    pub transcribed: u32,
    pub empty: u32,
    pub failed: u32,
}

#[derive(Debug, Clone)]
struct Candidate {
    recording_url: String,
    call_sid: Option<CallSid>,
}

pub struct TranscribeRecordingsHandler {
    repository: Arc<dyn CallRecordRepository>,
    recording_log: Arc<dyn RecordingLog>,
    transcriber: Arc<dyn Transcriber>,
    archive: Arc<dyn TranscriptArchive>,
}

impl TranscribeRecordingsHandler {
    pub fn new(
        repository: Arc<dyn CallRecordRepository>,
        recording_log: Arc<dyn RecordingLog>,
        transcriber: Arc<dyn Transcriber>,
        archive: Arc<dyn TranscriptArchive>,
    ) -> Self {
        Self {
            repository,
            recording_log,
            transcriber,
            archive,
        }
    }

    pub async fn handle(&self, cmd: TranscribeRecordingsCommand) -> TranscriptionSummary {
        let candidates = self.collect_candidates(cmd.limit).await;
        tracing::info!(candidates = candidates.len(), "Starting transcription sweep");

        let mut summary = TranscriptionSummary::default();
        for candidate in candidates {
            summary.attempted += 1;
            self.process(&candidate, &mut summary).await;
        }

        tracing::info!(
            attempted = summary.attempted,
            transcribed = summary.transcribed,
            empty = summary.empty,
            failed = summary.failed,
            "Transcription sweep finished"
        );
        summary
    }

    async fn collect_candidates(&self, limit: u32) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        match self.repository.find_untranscribed(limit).await {
            Ok(records) => {
                for record in records {
                    let Some(url) = record.recording_url else {
                        continue;
                    };
                    if seen.insert(url.clone()) {
                        candidates.push(Candidate {
                            recording_url: url,
                            call_sid: Some(record.call_sid),
                        });
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list untranscribed recordings");
            }
        }

        let logged = match self.recording_log.read_all().await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read recording log");
                Vec::new()
            }
        };

        for url in logged {
            if candidates.len() >= limit as usize {
                break;
            }
            if !seen.insert(url.clone()) {
                continue;
            }
            let call_sid = match self.repository.find_by_recording_url(&url).await {
                Ok(Some(record)) if record.transcription.is_some() => continue,
                Ok(Some(record)) => Some(record.call_sid),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(recording_url = %url, error = %e, "Could not match logged recording");
                    None
                }
            };
            if call_sid.is_none() && self.already_archived(&url).await {
                continue;
            }
            candidates.push(Candidate {
                recording_url: url,
                call_sid,
            });
        }

        candidates.truncate(limit as usize);
        candidates
    }

    /// Log-only recordings have no row to mark them done; the archive does.
    async fn already_archived(&self, url: &str) -> bool {
        let Some(sid) = recording_sid(url) else {
            return false;
        };
        match self.archive.contains(sid).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(recording_sid = sid, error = %e, "Could not check transcript archive");
                false
            }
        }
    }

    async fn process(&self, candidate: &Candidate, summary: &mut TranscriptionSummary) {
        let url = candidate.recording_url.as_str();

        let transcript = match self.transcriber.transcribe(url).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(recording_url = %url, "Recording has no speech");
                summary.empty += 1;
                return;
            }
            Err(e) => {
                tracing::error!(recording_url = %url, error = %e, "Transcription failed");
                summary.failed += 1;
                return;
            }
        };
        summary.transcribed += 1;

        match recording_sid(url) {
            Some(sid) => {
                if let Err(e) = self.archive.store(sid, &transcript).await {
                    tracing::error!(recording_sid = sid, error = %e, "Failed to archive transcript");
                }
            }
            None => tracing::warn!(recording_url = %url, "No recording identifier; transcript not archived"),
        }

        if let Some(call_sid) = &candidate.call_sid {
            if let Err(e) = self.repository.record_transcription(call_sid, &transcript).await {
                tracing::error!(call_sid = %call_sid, error = %e, "Failed to store transcript");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCallRecordRepository;
    use crate::adapters::transcription::MockTranscriber;
    use crate::ports::StorageError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockRecordingLog {
        entries: Vec<String>,
    }

    #[async_trait]
    impl RecordingLog for MockRecordingLog {
        async fn append(&self, _recording_url: &str) -> Result<(), StorageError> {
            Ok(())
        }

        async fn read_all(&self) -> Result<Vec<String>, StorageError> {
            Ok(self.entries.clone())
        }
    }

    #[derive(Default)]
    struct MockArchive {
        stored: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl TranscriptArchive for MockArchive {
        async fn store(&self, recording_sid: &str, transcript: &str) -> Result<(), StorageError> {
            self.stored
                .lock()
                .unwrap()
                .insert(recording_sid.to_string(), transcript.to_string());
            Ok(())
        }

        async fn contains(&self, recording_sid: &str) -> Result<bool, StorageError> {
            Ok(self.stored.lock().unwrap().contains_key(recording_sid))
        }
    }

    fn sid(s: &str) -> CallSid {
        CallSid::new(s).unwrap()
    }

    fn handler(
        repo: Arc<InMemoryCallRecordRepository>,
        log: Vec<&str>,
        transcriber: MockTranscriber,
        archive: Arc<MockArchive>,
    ) -> TranscribeRecordingsHandler {
        TranscribeRecordingsHandler::new(
            repo,
            Arc::new(MockRecordingLog {
                entries: log.into_iter().map(String::from).collect(),
            }),
            Arc::new(transcriber),
            archive,
        )
    }

    #[tokio::test]
    async fn transcribes_store_records_and_archives_text() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        repo.record_recording_url(&sid("CA1"), "https://r/Recordings/RE1")
            .await
            .unwrap();
        let archive = Arc::new(MockArchive::default());
        let transcriber =
            MockTranscriber::new().with_transcript("https://r/Recordings/RE1", "hello there");

        let summary = handler(repo.clone(), vec![], transcriber, archive.clone())
            .handle(TranscribeRecordingsCommand { limit: 10 })
            .await;

        assert_eq!(
            summary,
            TranscriptionSummary {
                attempted: 1,
                transcribed: 1,
                empty: 0,
                failed: 0
            }
        );
        assert_eq!(
            repo.get("CA1").await.unwrap().transcription.as_deref(),
            Some("hello there")
        );
        assert_eq!(
            archive.stored.lock().unwrap().get("RE1").map(String::as_str),
            Some("hello there")
        );
    }

    #[tokio::test]
    async fn log_entries_are_deduplicated_against_store() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        repo.record_recording_url(&sid("CA1"), "https://r/RE1")
            .await
            .unwrap();
        repo.record_recording_url(&sid("CA2"), "https://r/RE2")
            .await
            .unwrap();
        repo.record_transcription(&sid("CA2"), "already done")
            .await
            .unwrap();
        let transcriber = MockTranscriber::new()
            .with_transcript("https://r/RE1", "one")
            .with_transcript("https://r/RE3", "three");

        let t = transcriber.clone();
        let summary = handler(
            repo,
            vec!["https://r/RE1", "https://r/RE2", "https://r/RE3", "https://r/RE3"],
            transcriber,
            Arc::new(MockArchive::default()),
        )
        .handle(TranscribeRecordingsCommand { limit: 10 })
        .await;

        assert_eq!(t.calls(), vec!["https://r/RE1", "https://r/RE3"]);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.transcribed, 2);
    }

    #[tokio::test]
    async fn failures_are_counted_and_sweep_continues() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        let transcriber = MockTranscriber::new()
            .with_failure("https://r/RE1", "backend down")
            .with_silence("https://r/RE2")
            .with_transcript("https://r/RE3", "ok");

        let summary = handler(
            repo,
            vec!["https://r/RE1", "https://r/RE2", "https://r/RE3"],
            transcriber,
            Arc::new(MockArchive::default()),
        )
        .handle(TranscribeRecordingsCommand { limit: 10 })
        .await;

        assert_eq!(
            summary,
            TranscriptionSummary {
                attempted: 3,
                transcribed: 1,
                empty: 1,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn limit_caps_attempts() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        let transcriber = MockTranscriber::new();
        let t = transcriber.clone();

        let summary = handler(
            repo,
            vec!["https://r/RE1", "https://r/RE2", "https://r/RE3"],
            transcriber,
            Arc::new(MockArchive::default()),
        )
        .handle(TranscribeRecordingsCommand { limit: 2 })
        .await;

        assert_eq!(summary.attempted, 2);
        assert_eq!(t.calls().len(), 2);
    }

    #[tokio::test]
    async fn store_outage_falls_back_to_log() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        repo.fail_reads(true);
        let transcriber = MockTranscriber::new().with_transcript("https://r/RE1", "saved");
        let archive = Arc::new(MockArchive::default());

        let summary = handler(repo, vec!["https://r/RE1"], transcriber, archive.clone())
            .handle(TranscribeRecordingsCommand { limit: 10 })
            .await;

        assert_eq!(summary.transcribed, 1);
        assert!(archive.stored.lock().unwrap().contains_key("RE1"));
    }

    #[tokio::test]
    async fn archived_log_only_recordings_are_not_transcribed_again() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        let archive = Arc::new(MockArchive::default());
        let transcriber = MockTranscriber::new()
            .with_transcript("https://r/Recordings/RE1", "one")
            .with_transcript("https://r/Recordings/RE2", "two")
            .with_transcript("https://r/Recordings/RE3", "three");
        let t = transcriber.clone();
        let sweep = handler(
            repo,
            vec![
                "https://r/Recordings/RE1",
                "https://r/Recordings/RE2",
                "https://r/Recordings/RE3",
            ],
            transcriber,
            archive.clone(),
        );

        let first = sweep.handle(TranscribeRecordingsCommand { limit: 2 }).await;
        let second = sweep.handle(TranscribeRecordingsCommand { limit: 2 }).await;
        let third = sweep.handle(TranscribeRecordingsCommand { limit: 2 }).await;

        assert_eq!(first.transcribed, 2);
        assert_eq!(
            second,
            TranscriptionSummary {
                attempted: 1,
                transcribed: 1,
                empty: 0,
                failed: 0
            }
        );
        assert_eq!(third.attempted, 0);
        assert_eq!(
            t.calls(),
            vec![
                "https://r/Recordings/RE1",
                "https://r/Recordings/RE2",
                "https://r/Recordings/RE3"
            ]
        );
        assert_eq!(
            archive.stored.lock().unwrap().get("RE3").map(String::as_str),
            Some("three")
        );
    }

    #[tokio::test]
    async fn archived_recording_with_untranscribed_row_is_still_processed() {
        let repo = Arc::new(InMemoryCallRecordRepository::new());
        repo.record_recording_url(&sid("CA1"), "https://r/Recordings/RE1")
            .await
            .unwrap();
        let archive = Arc::new(MockArchive::default());
        archive.store("RE1", "earlier").await.unwrap();
        let transcriber = MockTranscriber::new().with_transcript("https://r/Recordings/RE1", "now");

        let summary = handler(
            repo.clone(),
            vec!["https://r/Recordings/RE1"],
            transcriber,
            archive,
        )
        .handle(TranscribeRecordingsCommand { limit: 10 })
        .await;

        assert_eq!(summary.transcribed, 1);
        assert_eq!(
            repo.get("CA1").await.unwrap().transcription.as_deref(),
            Some("now")
        );
    }
}
