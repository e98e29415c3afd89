//! HTTP handlers for the telephony voice callbacks.
//!
//! Every callback answers `200` with a markup document, whatever happened
//! while handling it. Faults are turned into spoken apologies by the
//! application handlers; this layer only extracts, logs and renders.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};

use crate::application::handlers::intake::{
    AssistantSettings, HandleRecordingCommand, HandleRecordingHandler, HandleRecordingResult,
    IntakeFlow, RecordAnswerCommand, RecordAnswerHandler, StartCallCommand, StartCallHandler,
    StartHandoffCommand, StartHandoffHandler,
};
use crate::domain::intake::IntakeField;
use crate::domain::telephony::VoiceResponse;
use crate::ports::{AIProvider, CallRecordRepository, RecordingLog};

use super::dto::{AttemptQuery, VoiceCallbackForm};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the voice endpoints.
///
/// Cloned per request; handlers are built on demand from the Arc-wrapped
/// ports so no call state lives here.
#[derive(Clone)]
pub struct VoiceAppState {
    pub call_records: Arc<dyn CallRecordRepository>,
    pub recording_log: Arc<dyn RecordingLog>,
    pub ai_provider: Arc<dyn AIProvider>,
    pub flow: Arc<IntakeFlow>,
    pub assistant: AssistantSettings,
}

impl VoiceAppState {
    pub fn start_call_handler(&self) -> StartCallHandler {
        StartCallHandler::new(self.flow.clone())
    }

    pub fn record_answer_handler(&self) -> RecordAnswerHandler {
        RecordAnswerHandler::new(self.call_records.clone(), self.flow.max_reprompts())
    }

    pub fn start_handoff_handler(&self) -> StartHandoffHandler {
        StartHandoffHandler::new(
            self.call_records.clone(),
            self.ai_provider.clone(),
            self.assistant.clone(),
        )
    }

    pub fn handle_recording_handler(&self) -> HandleRecordingHandler {
        HandleRecordingHandler::new(self.call_records.clone(), self.recording_log.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Markup document served as `application/xml`.
#[derive(Debug)]
pub struct Xml(pub VoiceResponse);

impl IntoResponse for Xml {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            self.0.to_xml(),
        )
            .into_response()
    }
}

/// Unreadable payloads are logged and handled as if empty.
fn callback_form(
    path: &'static str,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> VoiceCallbackForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(path, error = %rejection, "Unreadable callback payload");
            VoiceCallbackForm::default()
        }
    }
}

fn attempt_query(path: &'static str, query: Result<Query<AttemptQuery>, QueryRejection>) -> u32 {
    match query {
        Ok(Query(query)) => query.attempt(),
        Err(rejection) => {
            tracing::warn!(path, error = %rejection, "Unreadable attempt counter");
            0
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /voice - Greet a new call and ask for the first name
pub async fn start_call(
    State(state): State<VoiceAppState>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    let form = callback_form("/voice", form);
    let cmd = StartCallCommand {
        call_sid: form.call_sid(),
    };
    Xml(state.start_call_handler().handle(cmd))
}

async fn process_step(
    state: VoiceAppState,
    field: IntakeField,
    query: Result<Query<AttemptQuery>, QueryRejection>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    let path = field.step_path();
    let attempt = attempt_query(path, query);
    let form = callback_form(path, form);
    tracing::debug!(
        path,
        call_sid = ?form.call_sid,
        attempt,
        has_speech = form.speech_result.is_some(),
        "Step callback received"
    );

    let cmd = RecordAnswerCommand {
        call_sid: form.call_sid(),
        field,
        speech: form.speech_result,
        attempt,
    };
    let outcome = state.record_answer_handler().handle(cmd).await;
    Xml(state.flow.render_step(&outcome))
}

/// POST /process_first_name
pub async fn process_first_name(
    State(state): State<VoiceAppState>,
    query: Result<Query<AttemptQuery>, QueryRejection>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    process_step(state, IntakeField::FirstName, query, form).await
}

/// POST /process_last_name
pub async fn process_last_name(
    State(state): State<VoiceAppState>,
    query: Result<Query<AttemptQuery>, QueryRejection>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    process_step(state, IntakeField::LastName, query, form).await
}

/// POST /process_age
pub async fn process_age(
    State(state): State<VoiceAppState>,
    query: Result<Query<AttemptQuery>, QueryRejection>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    process_step(state, IntakeField::Age, query, form).await
}

/// POST /process_residency
pub async fn process_residency(
    State(state): State<VoiceAppState>,
    query: Result<Query<AttemptQuery>, QueryRejection>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    process_step(state, IntakeField::Residency, query, form).await
}

/// POST /start_gpt_conversation - Hand the caller's answers to the assistant
pub async fn start_handoff(
    State(state): State<VoiceAppState>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> Xml {
    let form = callback_form("/start_gpt_conversation", form);
    let cmd = StartHandoffCommand {
        call_sid: form.call_sid(),
    };
    let outcome = state.start_handoff_handler().handle(cmd).await;
    Xml(state.flow.render_handoff(&outcome))
}

/// POST /handle-recording - Store a finished recording's location
///
/// Always answers an empty `200`; the provider does not act on the body.
pub async fn handle_recording(
    State(state): State<VoiceAppState>,
    form: Result<Form<VoiceCallbackForm>, FormRejection>,
) -> StatusCode {
    let form = callback_form("/handle-recording", form);
    let cmd = HandleRecordingCommand {
        call_sid: form.call_sid(),
        recording_url: form.recording_url,
    };
    if let HandleRecordingResult::Recorded {
        persisted: false,
        logged: false,
    } = state.handle_recording_handler().handle(cmd).await
    {
        tracing::error!("Recording location was neither stored nor logged");
    }
    StatusCode::OK
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::InMemoryCallRecordRepository;
    use crate::domain::foundation::CallSid;
    use crate::ports::StorageError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockRecordingLog {
        entries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RecordingLog for MockRecordingLog {
        async fn append(&self, recording_url: &str) -> Result<(), StorageError> {
            self.entries.lock().unwrap().push(recording_url.to_string());
            Ok(())
        }

        async fn read_all(&self) -> Result<Vec<String>, StorageError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    fn test_state(repo: InMemoryCallRecordRepository) -> VoiceAppState {
        VoiceAppState {
            call_records: Arc::new(repo),
            recording_log: Arc::new(MockRecordingLog::default()),
            ai_provider: Arc::new(MockAIProvider::new().with_response("Hi Jordan!")),
            flow: Arc::new(IntakeFlow::new("https://calls.example.com", "alice")),
            assistant: AssistantSettings::default(),
        }
    }

    fn form(call_sid: &str, speech: Option<&str>) -> Result<Form<VoiceCallbackForm>, FormRejection> {
        Ok(Form(VoiceCallbackForm {
            call_sid: Some(call_sid.to_string()),
            speech_result: speech.map(str::to_string),
            recording_url: None,
        }))
    }

    fn first_attempt() -> Result<Query<AttemptQuery>, QueryRejection> {
        Ok(Query(AttemptQuery::default()))
    }

    #[tokio::test]
    async fn xml_response_sets_content_type() {
        let response = Xml(VoiceResponse::new().hangup()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
    }

    #[tokio::test]
    async fn start_call_asks_for_first_name() {
        let state = test_state(InMemoryCallRecordRepository::new());
        let Xml(response) = start_call(State(state), form("CA1", None)).await;
        assert_eq!(
            response.gather_action(),
            Some("https://calls.example.com/process_first_name")
        );
    }

    #[tokio::test]
    async fn process_first_name_stores_answer() {
        let repo = InMemoryCallRecordRepository::new();
        let state = test_state(repo.clone());

        let Xml(response) =
            process_first_name(State(state), first_attempt(), form("CA1", Some("Jordan."))).await;

        assert_eq!(repo.get("CA1").await.unwrap().first_name.as_deref(), Some("Jordan"));
        assert_eq!(
            response.gather_action(),
            Some("https://calls.example.com/process_last_name")
        );
    }

    #[tokio::test]
    async fn process_age_without_speech_reprompts() {
        let repo = InMemoryCallRecordRepository::new();
        let state = test_state(repo.clone());

        let Xml(response) = process_age(State(state), first_attempt(), form("CA1", None)).await;

        assert!(repo.get("CA1").await.is_none());
        assert_eq!(
            response.gather_action(),
            Some("https://calls.example.com/process_age?attempt=1")
        );
    }

    #[tokio::test]
    async fn start_handoff_speaks_reply_and_hangs_up() {
        let repo = InMemoryCallRecordRepository::new();
        let mut record = crate::domain::intake::CallRecord::new(CallSid::new("CA1").unwrap());
        record.first_name = Some("Jordan".to_string());
        repo.insert(record).await;
        let state = test_state(repo);

        let Xml(response) = start_handoff(State(state), form("CA1", None)).await;

        assert_eq!(response.spoken(), vec!["Hi Jordan!"]);
        assert!(response.ends_call());
    }

    #[tokio::test]
    async fn handle_recording_always_answers_ok() {
        let repo = InMemoryCallRecordRepository::new();
        repo.fail_writes(true);
        let state = test_state(repo);
        let payload = Ok(Form(VoiceCallbackForm {
            call_sid: Some("CA1".to_string()),
            speech_result: None,
            recording_url: Some("https://api.example.com/Recordings/RE1".to_string()),
        }));

        assert_eq!(handle_recording(State(state), payload).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        assert_eq!(health().await, "ok");
    }
}
