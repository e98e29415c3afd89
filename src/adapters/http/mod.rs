//! HTTP adapters - webhook endpoints for the telephony provider.

pub mod middleware;
pub mod voice;

pub use voice::{voice_router, VoiceAppState};
