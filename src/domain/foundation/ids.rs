//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Call identifier assigned by the telephony provider.
///
/// Opaque to this system; the only guarantee is that it is stable for the
/// lifetime of one phone call. Surrounding whitespace is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallSid(String);

impl CallSid {
    /// Creates a new CallSid, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("call_sid"));
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Parses an optional raw form value.
    ///
    /// Returns `None` when the value is absent or blank.
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| Self::new(s).ok())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CallSid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_sid_accepts_provider_token() {
        let sid = CallSid::new("CA1234567890abcdef").unwrap();
        assert_eq!(sid.as_str(), "CA1234567890abcdef");
    }

    #[test]
    fn call_sid_rejects_empty() {
        assert!(CallSid::new("").is_err());
        assert!(CallSid::new("   ").is_err());
    }

    #[test]
    fn call_sid_trims_whitespace() {
        let sid = CallSid::new("  CA1 \n").unwrap();
        assert_eq!(sid.as_str(), "CA1");
    }

    #[test]
    fn from_optional_handles_missing_and_blank() {
        assert_eq!(CallSid::from_optional(None), None);
        assert_eq!(CallSid::from_optional(Some("")), None);
        assert_eq!(
            CallSid::from_optional(Some("CA9")),
            Some(CallSid::new("CA9").unwrap())
        );
    }

    #[test]
    fn call_sid_parses_from_str() {
        let sid: CallSid = "CA42".parse().unwrap();
        assert_eq!(sid.to_string(), "CA42");
    }

    #[test]
    fn call_sid_serializes_transparently() {
        let sid = CallSid::new("CA7").unwrap();
        assert_eq!(serde_json::to_string(&sid).unwrap(), "\"CA7\"");
    }
}
