//! Recording transcription handlers.

mod transcribe_recordings;

pub use transcribe_recordings::{
    TranscribeRecordingsCommand, TranscribeRecordingsHandler, TranscriptionSummary,
};
