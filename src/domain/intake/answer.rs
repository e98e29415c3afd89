//! Recognized speech accepted as an answer.

use std::fmt;

/// Non-empty speech text for one dialog step.
///
/// Speech recognizers pad results with whitespace and sentence punctuation
/// ("Jordan."). Both are stripped; what remains must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAnswer(String);

impl SpeechAnswer {
    /// Normalizes a raw `SpeechResult`.
    ///
    /// Returns `None` for absent, blank or punctuation-only input, which the
    /// coordinator treats as a recognition failure.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let text = raw?
            .trim()
            .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ','))
            .trim();

        if text.is_empty() {
            None
        } else {
            Some(Self(text.to_string()))
        }
    }

    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the answer and returns the normalized text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SpeechAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
