//! Voice callback endpoints.
//!
//! The telephony provider drives the dialog: each callback carries the call
//! identifier and, for question steps, the recognized speech. The response
//! document names the next callback URL.
//!
//! - `POST /voice` - Start of call
//! - `POST /process_*` - Question steps
//! - `POST /start_gpt_conversation` - Assistant handoff
//! - `POST /handle-recording` - Recording callback
//! - `GET /health` - Liveness

mod dto;
mod handlers;
mod routes;

pub use dto::{AttemptQuery, VoiceCallbackForm};
pub use handlers::{VoiceAppState, Xml};
pub use routes::{voice_router, voice_routes, RECORDING_PATH};
