//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod intake;
pub mod transcription;
