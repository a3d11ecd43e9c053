use crate::audio::AudioClip;
use crate::error::WorkflowError;
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Result of one transcription call.
///
/// The confirmation clip behind `confirmation_audio_url` is rendered
/// asynchronously server-side; it may not be fetchable yet when this value
/// is returned (see the playback poller).
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub transcript_text: String,
    pub confirmation_audio_url: String,
}

/// Speech-to-text seam; the workflow only depends on this trait.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        device_id: &str,
    ) -> Result<TranscriptResult, WorkflowError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    audio_url: String,
}

/// HTTP client for the speech recognition endpoint
pub struct TranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TranscriptionClient {
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self, WorkflowError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WorkflowError::TranscriptionFailed(format!("client: {}", e)))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Transcriber for TranscriptionClient {
    async fn transcribe(
        &self,
        clip: &AudioClip,
        device_id: &str,
    ) -> Result<TranscriptResult, WorkflowError> {
        if clip.is_empty() {
            return Err(WorkflowError::TranscriptionFailed(
                "empty audio clip".to_string(),
            ));
        }

        let wav_bytes = clip
            .to_wav_bytes()
            .map_err(|e| WorkflowError::TranscriptionFailed(format!("encode: {}", e)))?;

        let file_part = multipart::Part::bytes(wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| WorkflowError::TranscriptionFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .part("audio_file", file_part)
            .text("device_id", device_id.to_string());

        debug!(
            endpoint = %self.endpoint,
            duration_secs = clip.duration_seconds(),
            "Sending clip to speech endpoint"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WorkflowError::TranscriptionFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(WorkflowError::TranscriptionFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| WorkflowError::TranscriptionFailed(format!("body: {}", e)))?;

        info!(
            chars = parsed.text.len(),
            "Transcription completed"
        );

        Ok(TranscriptResult {
            transcript_text: parsed.text.trim().to_string(),
            confirmation_audio_url: parsed.audio_url,
        })
    }
}
