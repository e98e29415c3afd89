//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI chat completions (and a scripted mock)
//! - `files` - Recording log and transcript archive on local disk
//! - `http` - Axum webhook endpoints for the telephony provider
//! - `memory` - In-memory call-record store for tests and local runs
//! - `postgres` - PostgreSQL call-record store
//! - `transcription` - Speech-to-text over HTTP (and a scripted mock)

pub mod ai;
pub mod files;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod transcription;
