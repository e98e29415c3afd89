//! Local filesystem adapters.

mod file_recording_log;
mod file_transcript_archive;

pub use file_recording_log::FileRecordingLog;
pub use file_transcript_archive::FileTranscriptArchive;
