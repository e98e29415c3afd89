//! Telephony module - the provider's callback contract.
//!
//! Responses going out to the provider and signatures on requests coming in.

mod response;
mod signature;

pub use response::{Gather, Say, Verb, VoiceResponse};
pub use signature::{SignatureError, TelephonySignatureVerifier, SIGNATURE_HEADER};
