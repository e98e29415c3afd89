//! HTTP middleware for axum.
//!
//! - `telephony_signature` - Rejects callbacks the provider did not sign

pub mod telephony_signature;

pub use telephony_signature::{telephony_signature_middleware, SignatureState};
