//! Intake dialog command handlers.

mod flow;
mod handle_recording;
mod record_answer;
mod start_call;
mod start_handoff;

pub use flow::{IntakeFlow, DEFAULT_MAX_REPROMPTS, HANDOFF_PATH, START_PATH};
pub use handle_recording::{HandleRecordingCommand, HandleRecordingHandler, HandleRecordingResult};
pub use record_answer::{RecordAnswerCommand, RecordAnswerHandler, RepromptReason, StepOutcome};
pub use start_call::{StartCallCommand, StartCallHandler};
pub use start_handoff::{
    AssistantSettings, HandoffOutcome, StartHandoffCommand, StartHandoffHandler,
    DEFAULT_SYSTEM_PROMPT,
};
