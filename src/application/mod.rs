//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::intake::{
    AssistantSettings, HandleRecordingCommand, HandleRecordingHandler, HandleRecordingResult, HandoffOutcome,
    IntakeFlow, RecordAnswerCommand, RecordAnswerHandler, RepromptReason, StartCallCommand,
    StartCallHandler, StartHandoffCommand, StartHandoffHandler, StepOutcome,
};
pub use handlers::transcription::{
    TranscribeRecordingsCommand, TranscribeRecordingsHandler, TranscriptionSummary,
};
