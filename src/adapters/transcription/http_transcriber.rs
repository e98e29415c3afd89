//! HTTP Transcriber - downloads a call recording and sends it to an
//! OpenAI-compatible `/audio/transcriptions` endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::ports::{Transcriber, TranscriptionError};

/// Configuration for the HTTP transcriber.
#[derive(Debug, Clone)]
pub struct HttpTranscriberConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub language: Option<String>,
    pub timeout: Duration,
    /// Provider account used to fetch protected recordings.
    pub recording_auth: Option<(String, Secret<String>)>,
}

impl HttpTranscriberConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "whisper-1".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            language: None,
            timeout: Duration::from_secs(120),
            recording_auth: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_recording_auth(
        mut self,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        self.recording_auth = Some((account_sid.into(), Secret::new(auth_token.into())));
        self
    }
}

pub struct HttpTranscriber {
    config: HttpTranscriberConfig,
    client: Client,
}

impl HttpTranscriber {
    /// # Errors
    ///
    /// Returns `Backend` if the HTTP client cannot be built.
    pub fn new(config: HttpTranscriberConfig) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TranscriptionError::Backend(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn transcriptions_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn download(&self, recording_url: &str) -> Result<Vec<u8>, TranscriptionError> {
        let mut request = self.client.get(recording_url);
        if let Some((account_sid, auth_token)) = &self.config.recording_auth {
            request = request.basic_auth(account_sid, Some(auth_token.expose_secret()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscriptionError::Download(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptionError::Download(format!(
                "recording fetch returned {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TranscriptionError::Download(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn submit(&self, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        let part = Part::bytes(audio)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Backend(e.to_string()))?;
        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(self.transcriptions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Backend(format!(
                "transcription returned {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, recording_url: &str) -> Result<Option<String>, TranscriptionError> {
        let audio = self.download(recording_url).await?;
        if audio.is_empty() {
            return Ok(None);
        }

        let text = self.submit(audio).await?;
        Ok(non_blank(text))
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_whisper() {
        let config = HttpTranscriberConfig::new("key");
        assert_eq!(config.model, "whisper-1");
        assert!(config.language.is_none());
        assert!(config.recording_auth.is_none());
    }

    #[test]
    fn transcriptions_url_is_joined() {
        let transcriber = HttpTranscriber::new(
            HttpTranscriberConfig::new("key").with_base_url("http://localhost:9000/v1/"),
        )
        .unwrap();
        assert_eq!(
            transcriber.transcriptions_url(),
            "http://localhost:9000/v1/audio/transcriptions"
        );
    }

    #[test]
    fn blank_transcripts_become_none() {
        assert_eq!(non_blank("   \n".to_string()), None);
        assert_eq!(non_blank(" hello ".to_string()), Some("hello".to_string()));
    }

    #[test]
    fn response_body_parses() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "My name is Jordan."}"#).unwrap();
        assert_eq!(parsed.text, "My name is Jordan.");
    }
}
