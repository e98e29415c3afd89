//! Telephony webhook signature verification.
//!
//! The provider signs every callback with HMAC-SHA1 keyed by the account
//! auth token. The signed payload is the full callback URL followed by each
//! form parameter's name and value, sorted by name, concatenated with no
//! separators. The digest is sent base64-encoded in `X-Twilio-Signature`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Header carrying the callback signature.
pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

/// Reasons a callback signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing signature header")]
    Missing,

    #[error("Signature is not valid base64")]
    Malformed,

    #[error("Signature does not match request")]
    Mismatch,

    #[error("Signing key rejected")]
    InvalidKey,
}

/// Verifies callback signatures for one provider account.
pub struct TelephonySignatureVerifier {
    auth_token: String,
}

impl TelephonySignatureVerifier {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }

    /// Checks `signature` against the URL and form parameters of a callback.
    ///
    /// # Errors
    ///
    /// - `Missing` - no signature was supplied
    /// - `Malformed` - the signature is not base64
    /// - `Mismatch` - the signature was made with another key or payload
    pub fn verify(
        &self,
        url: &str,
        params: &[(String, String)],
        signature: Option<&str>,
    ) -> Result<(), SignatureError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::Missing)?;
        let provided = STANDARD
            .decode(signature)
            .map_err(|_| SignatureError::Malformed)?;
        let expected = self.digest(url, params)?;

        if !constant_time_compare(&expected, &provided) {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }

    /// Produces the base64 signature the provider would send for a callback.
    pub fn sign(&self, url: &str, params: &[(String, String)]) -> Result<String, SignatureError> {
        Ok(STANDARD.encode(self.digest(url, params)?))
    }

    fn digest(&self, url: &str, params: &[(String, String)]) -> Result<Vec<u8>, SignatureError> {
        let mut mac = Hmac::<Sha1>::new_from_slice(self.auth_token.as_bytes())
            .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(signed_payload(url, params).as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn signed_payload(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut payload = String::from(url);
    for (name, value) in sorted {
        payload.push_str(name);
        payload.push_str(value);
    }
    payload
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
