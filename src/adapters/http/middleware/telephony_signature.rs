//! Webhook signature middleware for axum.
//!
//! Rejects callbacks whose `X-Twilio-Signature` does not match the request.
//! The signed URL is the public base URL plus the request's path and query,
//! which is exactly the callback URL the service handed to the provider.
//!
//! ```text
//! Request → buffer body → verify(url, form params, header)
//!                              ├─ ok  → rebuilt request → handler
//!                              └─ err → 403
//! ```

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::telephony::{TelephonySignatureVerifier, SIGNATURE_HEADER};

/// Callback bodies are a few dozen form fields.
const MAX_CALLBACK_BODY: usize = 64 * 1024;

/// Verifier plus the public origin callbacks are addressed to.
#[derive(Clone)]
pub struct SignatureState {
    verifier: Arc<TelephonySignatureVerifier>,
    base_url: Arc<str>,
}

impl SignatureState {
    pub fn new(verifier: TelephonySignatureVerifier, base_url: &str) -> Self {
        Self {
            verifier: Arc::new(verifier),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }
}

pub async fn telephony_signature_middleware(
    State(state): State<SignatureState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_CALLBACK_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Callback body unreadable");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let params: Vec<(String, String)> = serde_urlencoded::from_bytes(&bytes).unwrap_or_default();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.base_url, path_and_query);
    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = state.verifier.verify(&url, &params, signature) {
        tracing::warn!(url = %url, error = %e, "Rejected unsigned callback");
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
