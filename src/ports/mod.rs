//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CallRecordRepository` - per-call intake state
//! - `AIProvider` - generative-text backend used at handoff
//! - `RecordingLog` - append-only list of recording locations
//! - `Transcriber` - speech-to-text for call recordings
//! - `TranscriptArchive` - file copy of each transcript

mod ai_provider;
mod call_record_repository;
mod recording_log;
mod transcriber;
mod transcript_archive;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use call_record_repository::CallRecordRepository;
pub use recording_log::{RecordingLog, StorageError};
pub use transcriber::{Transcriber, TranscriptionError};
pub use transcript_archive::{recording_sid, TranscriptArchive};
