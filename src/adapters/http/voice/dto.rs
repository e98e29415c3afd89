//! Form payloads posted by the telephony provider.

use serde::Deserialize;

use crate::domain::foundation::CallSid;

/// Fields read from any voice callback.
///
/// The provider posts many more parameters than these; unknown ones are
/// ignored. Every field is optional so a missing value reaches the handler
/// instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceCallbackForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,

    #[serde(rename = "SpeechResult")]
    pub speech_result: Option<String>,

    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
}

impl VoiceCallbackForm {
    pub fn call_sid(&self) -> Option<CallSid> {
        CallSid::from_optional(self.call_sid.as_deref())
    }
}

/// Query string of a question step; `attempt` is absent on first asking.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AttemptQuery {
    pub attempt: Option<u32>,
}

impl AttemptQuery {
    pub fn attempt(&self) -> u32 {
        self.attempt.unwrap_or(0)
    }
}
