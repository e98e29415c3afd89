//! Axum router configuration for the voice callbacks.

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::application::handlers::intake::{HANDOFF_PATH, START_PATH};
use crate::domain::intake::IntakeField;

use super::handlers::{
    handle_recording, health, process_age, process_first_name, process_last_name,
    process_residency, start_call, start_handoff, VoiceAppState,
};
use crate::adapters::http::middleware::{telephony_signature_middleware, SignatureState};

/// Path the provider posts finished recordings to.
pub const RECORDING_PATH: &str = "/handle-recording";

/// Create the voice callback router.
///
/// # Routes
/// - `POST /voice` - Greeting
/// - `POST /process_first_name`, `/process_last_name`, `/process_age`,
///   `/process_residency` - One question each
/// - `POST /start_gpt_conversation` - Assistant handoff
/// - `POST /handle-recording` - Recording location
pub fn voice_routes() -> Router<VoiceAppState> {
    Router::new()
        .route(START_PATH, post(start_call))
        .route(IntakeField::FirstName.step_path(), post(process_first_name))
        .route(IntakeField::LastName.step_path(), post(process_last_name))
        .route(IntakeField::Age.step_path(), post(process_age))
        .route(IntakeField::Residency.step_path(), post(process_residency))
        .route(HANDOFF_PATH, post(start_handoff))
        .route(RECORDING_PATH, post(handle_recording))
}

/// Create the complete service router.
///
/// Callbacks are signature-checked when `signatures` is set; `/health` never
/// is. Every request is traced and bounded by `request_timeout`.
pub fn voice_router(
    state: VoiceAppState,
    signatures: Option<SignatureState>,
    request_timeout: Duration,
) -> Router {
    let mut callbacks = voice_routes();
    if let Some(signatures) = signatures {
        callbacks = callbacks.route_layer(middleware::from_fn_with_state(
            signatures,
            telephony_signature_middleware,
        ));
    }

    Router::new()
        .merge(callbacks)
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}
