use super::types::{NewRecording, Prompt, StoreSettings};
use crate::error::WorkflowError;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Persistence seam; the workflow and HTTP layer only depend on this trait.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Fetch an ordered batch of prompts, once per session
    async fn fetch_prompts(&self, count: u32) -> Result<Vec<Prompt>, WorkflowError>;

    /// Insert one accepted recording; success/failure only
    async fn insert_recording(&self, recording: &NewRecording) -> Result<(), WorkflowError>;

    /// Fetch the service settings row
    async fn fetch_settings(&self) -> Result<StoreSettings, WorkflowError>;
}

/// Client for the hosted data store's RPC surface.
///
/// Procedures are invoked as `POST {base}/rest/v1/rpc/{name}` with the
/// project API key in both the `apikey` and bearer headers.
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: String, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn call(
        &self,
        procedure: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, String> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, procedure);

        debug!(procedure, "Calling store procedure");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("{}: request: {}", procedure, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(format!("{}: status {}: {}", procedure, status, body));
        }

        Ok(response)
    }
}

#[async_trait]
impl RecordingStore for StoreClient {
    async fn fetch_prompts(&self, count: u32) -> Result<Vec<Prompt>, WorkflowError> {
        let response = self
            .call("fetch_questions", json!({ "count": count }))
            .await
            .map_err(WorkflowError::PromptFetchFailed)?;

        let prompts: Vec<Prompt> = response
            .json()
            .await
            .map_err(|e| WorkflowError::PromptFetchFailed(format!("body: {}", e)))?;

        info!(count = prompts.len(), "Fetched prompt batch");

        Ok(prompts)
    }

    async fn insert_recording(&self, recording: &NewRecording) -> Result<(), WorkflowError> {
        let body = serde_json::to_value(recording)
            .map_err(|e| WorkflowError::PersistenceFailed(format!("encode: {}", e)))?;

        self.call("insert_recording", body)
            .await
            .map_err(WorkflowError::PersistenceFailed)?;

        info!(
            question_id = recording.question_id,
            duration = recording.audio_duration,
            "Recording persisted"
        );

        Ok(())
    }

    async fn fetch_settings(&self) -> Result<StoreSettings, WorkflowError> {
        let response = self
            .call("fetch_settings", json!({}))
            .await
            .map_err(WorkflowError::PromptFetchFailed)?;

        let settings: StoreSettings = response
            .json()
            .await
            .map_err(|e| WorkflowError::PromptFetchFailed(format!("body: {}", e)))?;

        Ok(settings)
    }
}
