//! Transcript Archive Port - durable copy of each transcript.

use async_trait::async_trait;

use super::StorageError;

/// Port for storing transcripts outside the database.
///
/// Transcripts are keyed by the provider's recording identifier, the last
/// path segment of the recording location.
#[async_trait]
pub trait TranscriptArchive: Send + Sync {
    /// Store the transcript for a recording, replacing any earlier copy.
    async fn store(&self, recording_sid: &str, transcript: &str) -> Result<(), StorageError>;

    /// Whether a transcript for this recording has already been stored.
    async fn contains(&self, recording_sid: &str) -> Result<bool, StorageError>;
}

/// Extracts the recording identifier from a recording location.
///
/// `https://api.twilio.com/.../Recordings/RE123.mp3` yields `RE123`.
pub fn recording_sid(recording_url: &str) -> Option<&str> {
    let without_query = recording_url.split(['?', '#']).next()?;
    let segment = without_query.trim_end_matches('/').rsplit('/').next()?;
    let sid = segment.split('.').next()?;
    (!sid.is_empty()).then_some(sid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_archive_is_object_safe() {
        fn _accepts_dyn(_archive: &dyn TranscriptArchive) {}
    }

    #[test]
    fn recording_sid_is_last_path_segment() {
        assert_eq!(
            recording_sid("https://api.twilio.com/2010-04-01/Accounts/AC1/Recordings/RE123"),
            Some("RE123")
        );
    }

    #[test]
    fn recording_sid_drops_extension_and_query() {
        assert_eq!(
            recording_sid("https://api.twilio.com/Recordings/RE9.mp3?Download=true"),
            Some("RE9")
        );
        assert_eq!(recording_sid("https://host/Recordings/RE7/"), Some("RE7"));
    }

    #[test]
    fn recording_sid_rejects_empty() {
        assert_eq!(recording_sid(""), None);
        assert_eq!(recording_sid("https://host/.mp3"), None);
    }
}
