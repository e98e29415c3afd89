//! RecordAnswerHandler - stores one spoken answer and decides the next step.

use std::sync::Arc;

use crate::domain::foundation::CallSid;
use crate::domain::intake::{IntakeError, IntakeField, SpeechAnswer};
use crate::ports::CallRecordRepository;

/// Command produced by one question-step callback.
#[derive(Debug, Clone)]
pub struct RecordAnswerCommand {
    pub call_sid: Option<CallSid>,
    pub field: IntakeField,
    pub speech: Option<String>,
    /// Re-prompts already spent on this field.
    pub attempt: u32,
}

/// Why a question is being asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepromptReason {
    NoSpeech,
    SaveFailed,
}

/// What the caller hears next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Answer stored; ask the next field.
    Advanced {
        field: IntakeField,
        answer: String,
        next: IntakeField,
    },
    /// Ask the same field again.
    Reprompt {
        field: IntakeField,
        attempt: u32,
        reason: RepromptReason,
    },
    /// Re-prompts used up on an intermediate field; end the call.
    Exhausted { field: IntakeField },
    /// Move on to the assistant.
    Handoff { saved: bool },
    /// The callback could not be tied to a call.
    StartOver,
}

/// Handler for the four question steps.
pub struct RecordAnswerHandler {
    repository: Arc<dyn CallRecordRepository>,
    max_reprompts: u32,
}

impl RecordAnswerHandler {
    pub fn new(repository: Arc<dyn CallRecordRepository>, max_reprompts: u32) -> Self {
        Self {
            repository,
            max_reprompts,
        }
    }

    /// Never fails: every fault becomes an outcome the caller can hear.
    pub async fn handle(&self, cmd: RecordAnswerCommand) -> StepOutcome {
        let field = cmd.field;

        let Some(call_sid) = cmd.call_sid else {
            let err = IntakeError::record_missing(None);
            tracing::warn!(field = %field, error = %err, "Step callback without call identifier");
            return StepOutcome::StartOver;
        };

        let Some(answer) = SpeechAnswer::parse(cmd.speech.as_deref()) else {
            let err = IntakeError::recognition_empty(field);
            tracing::info!(
                call_sid = %call_sid,
                field = %field,
                attempt = cmd.attempt,
                error = %err,
                "No speech recognized"
            );
            return self.retry(field, cmd.attempt, RepromptReason::NoSpeech);
        };

        match self.repository.record_answer(&call_sid, field, &answer).await {
            Ok(record) => {
                tracing::info!(
                    call_sid = %call_sid,
                    field = %field,
                    stage = ?record.stage(),
                    "Answer stored"
                );
            }
            Err(e) => {
                let err = IntakeError::from(e);
                tracing::error!(call_sid = %call_sid, field = %field, error = %err, "Failed to store answer");
                if field.is_last() {
                    return StepOutcome::Handoff { saved: false };
                }
                return self.retry(field, cmd.attempt, RepromptReason::SaveFailed);
            }
        }

        match field.next() {
            Some(next) => StepOutcome::Advanced {
                field,
                answer: answer.into_inner(),
                next,
            },
            None => StepOutcome::Handoff { saved: true },
        }
    }

    fn retry(&self, field: IntakeField, attempt: u32, reason: RepromptReason) -> StepOutcome {
        let attempt = attempt.saturating_add(1);
        if attempt <= self.max_reprompts {
            return StepOutcome::Reprompt {
                field,
                attempt,
                reason,
            };
        }

        tracing::warn!(field = %field, attempt, "Re-prompt limit reached");
        if field.is_last() {
            StepOutcome::Handoff { saved: false }
        } else {
            StepOutcome::Exhausted { field }
        }
    }
}
