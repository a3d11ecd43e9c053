use super::backend::CaptureBackend;
use super::clip::AudioClip;
use crate::error::WorkflowError;
use std::path::PathBuf;
use tracing::{error, info};

/// Capture backend that "records" a WAV file from disk.
///
/// Follows the same rules as the microphone backend: one active capture at
/// a time, idempotent stop. Used by tests and environments without an
/// input device.
pub struct FixtureCapture {
    path: PathBuf,
    capturing: bool,
}

impl FixtureCapture {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for FixtureCapture {
    async fn start(&mut self) -> Result<(), WorkflowError> {
        if self.capturing {
            return Err(WorkflowError::CaptureActive);
        }
        if !self.path.exists() {
            return Err(WorkflowError::DeviceUnavailable);
        }

        info!("Fixture capture started: {}", self.path.display());
        self.capturing = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<Option<AudioClip>, WorkflowError> {
        if !self.capturing {
            return Ok(None);
        }
        self.capturing = false;

        match AudioClip::open(&self.path) {
            Ok(clip) => Ok(Some(clip)),
            Err(e) => {
                error!("Failed to read fixture {}: {}", self.path.display(), e);
                Err(WorkflowError::DeviceUnavailable)
            }
        }
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
