//! StartHandoffHandler - hands the caller over to the assistant.
//!
//! The assistant's context is rebuilt from the stored record on every
//! request; nothing about the conversation is kept in memory.

use std::sync::Arc;

use crate::domain::foundation::{CallSid, StateMachine};
use crate::domain::intake::{IntakeError, IntakeStage};
use crate::ports::{AIProvider, CallRecordRepository, CompletionRequest, MessageRole};

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// How the assistant is asked to reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub system_prompt: String,
    /// Reply length cap; the backend's own default when unset.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl AssistantSettings {
    fn request(&self) -> CompletionRequest {
        let mut request = CompletionRequest::new().with_system_prompt(self.system_prompt.clone());
        if let Some(max) = self.max_tokens {
            request = request.with_max_tokens(max);
        }
        if let Some(temp) = self.temperature {
            request = request.with_temperature(temp);
        }
        request
    }
}

#[derive(Debug, Clone, Default)]
pub struct StartHandoffCommand {
    pub call_sid: Option<CallSid>,
}

/// What the assistant step says before hanging up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffOutcome {
    Reply(String),
    EmptyReply,
    BackendFailed,
    RecordMissing,
}

pub struct StartHandoffHandler {
    repository: Arc<dyn CallRecordRepository>,
    ai_provider: Arc<dyn AIProvider>,
    settings: AssistantSettings,
}

impl StartHandoffHandler {
    pub fn new(
        repository: Arc<dyn CallRecordRepository>,
        ai_provider: Arc<dyn AIProvider>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            repository,
            ai_provider,
            settings,
        }
    }

    pub async fn handle(&self, cmd: StartHandoffCommand) -> HandoffOutcome {
        let Some(call_sid) = cmd.call_sid else {
            let err = IntakeError::record_missing(None);
            tracing::warn!(error = %err, "Handoff without call identifier");
            return HandoffOutcome::RecordMissing;
        };

        let record = match self.repository.find_by_call_sid(&call_sid).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                let err = IntakeError::record_missing(Some(call_sid.clone()));
                tracing::warn!(call_sid = %call_sid, error = %err, "No record to hand off");
                return HandoffOutcome::RecordMissing;
            }
            Err(e) => {
                let err = IntakeError::from(e);
                tracing::error!(call_sid = %call_sid, error = %err, "Failed to load record for handoff");
                return HandoffOutcome::RecordMissing;
            }
        };

        let stage = record.stage();
        if !stage.can_transition_to(&IntakeStage::HandedOff) {
            tracing::warn!(call_sid = %call_sid, stage = ?stage, "Handing off an incomplete intake");
        }

        let request = self
            .settings
            .request()
            .with_message(MessageRole::User, record.introduction())
            .for_call(call_sid.clone());

        match self.ai_provider.complete(request).await {
            Ok(response) => {
                let reply = response.content.trim();
                tracing::info!(
                    call_sid = %call_sid,
                    model = %response.model,
                    tokens = response.usage.total_tokens,
                    "Assistant replied"
                );
                if reply.is_empty() {
                    HandoffOutcome::EmptyReply
                } else {
                    HandoffOutcome::Reply(reply.to_string())
                }
            }
            Err(e) => {
                let err = IntakeError::backend(e.to_string());
                tracing::error!(call_sid = %call_sid, error = %err, "Assistant request failed");
                HandoffOutcome::BackendFailed
            }
        }
    }
}
