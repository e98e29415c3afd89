//! Domain layer containing the intake dialog's types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (call identifier, timestamps, errors)
//! - `intake` - The four-question questionnaire and the per-call record
//! - `telephony` - Provider response markup and callback signatures

pub mod foundation;
pub mod intake;
pub mod telephony;
