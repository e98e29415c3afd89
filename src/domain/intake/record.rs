//! CallRecord - everything known about one call.

use serde::{Deserialize, Serialize};

use super::{IntakeField, IntakeStage, SpeechAnswer};
use crate::domain::foundation::{CallSid, Timestamp};

/// Placeholder spoken for a field the caller never answered.
const UNKNOWN: &str = "unknown";

/// Persisted state of a single call, keyed by its provider call identifier.
///
/// Each intake field is written only by its own step. Re-submitting a step
/// overwrites that field (last write wins) and leaves the others alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_sid: CallSid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<String>,
    pub residency: Option<String>,
    pub recording_url: Option<String>,
    pub transcription: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CallRecord {
    /// Creates an empty record for a call seen for the first time.
    pub fn new(call_sid: CallSid) -> Self {
        let now = Timestamp::now();
        Self {
            call_sid,
            first_name: None,
            last_name: None,
            age: None,
            residency: None,
            recording_url: None,
            transcription: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the stored answer for a field.
    pub fn answer(&self, field: IntakeField) -> Option<&str> {
        match field {
            IntakeField::FirstName => self.first_name.as_deref(),
            IntakeField::LastName => self.last_name.as_deref(),
            IntakeField::Age => self.age.as_deref(),
            IntakeField::Residency => self.residency.as_deref(),
        }
    }

    /// Stores the answer for exactly one field.
    pub fn set_answer(&mut self, field: IntakeField, answer: SpeechAnswer) {
        let value = Some(answer.into_inner());
        match field {
            IntakeField::FirstName => self.first_name = value,
            IntakeField::LastName => self.last_name = value,
            IntakeField::Age => self.age = value,
            IntakeField::Residency => self.residency = value,
        }
        self.touch();
    }

    /// Stores (or replaces) the recording location.
    pub fn set_recording_url(&mut self, url: impl Into<String>) {
        self.recording_url = Some(url.into());
        self.touch();
    }

    /// Stores the transcript of the call recording.
    pub fn set_transcription(&mut self, text: impl Into<String>) {
        self.transcription = Some(text.into());
        self.touch();
    }

    /// First field in asking order that has no answer yet.
    pub fn first_unanswered(&self) -> Option<IntakeField> {
        IntakeField::all()
            .iter()
            .copied()
            .find(|field| self.answer(*field).is_none())
    }

    /// Dialog stage derived from the stored answers.
    pub fn stage(&self) -> IntakeStage {
        match self.first_unanswered() {
            Some(IntakeField::FirstName) => IntakeStage::Start,
            Some(IntakeField::LastName) => IntakeStage::GotFirstName,
            Some(IntakeField::Age) => IntakeStage::GotLastName,
            Some(IntakeField::Residency) => IntakeStage::GotAge,
            None => IntakeStage::GotResidency,
        }
    }

    /// True once all four answers are stored.
    pub fn is_complete(&self) -> bool {
        self.first_unanswered().is_none()
    }

    /// The caller's self-introduction handed to the assistant.
    pub fn introduction(&self) -> String {
        format!(
            "My name is {} {}. I am {} years old and live in {}.",
            self.first_name.as_deref().unwrap_or(UNKNOWN),
            self.last_name.as_deref().unwrap_or(UNKNOWN),
            self.age.as_deref().unwrap_or(UNKNOWN),
            self.residency.as_deref().unwrap_or(UNKNOWN),
        )
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
