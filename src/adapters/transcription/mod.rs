//! Transcription adapters - implementations of the Transcriber port.

mod http_transcriber;
mod mock_transcriber;

pub use http_transcriber::{HttpTranscriber, HttpTranscriberConfig};
pub use mock_transcriber::MockTranscriber;
