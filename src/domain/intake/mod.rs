//! Intake module - the spoken questionnaire and its persisted answers.

mod answer;
mod errors;
mod field;
mod record;
mod stage;

pub use answer::SpeechAnswer;
pub use errors::IntakeError;
pub use field::IntakeField;
pub use record::CallRecord;
pub use stage::IntakeStage;
