use super::clip::AudioClip;
use crate::error::WorkflowError;
use std::path::PathBuf;

/// Configuration for capture backends
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Preferred sample rate (the device may negotiate a different one)
    pub sample_rate: u32,
    /// Preferred channel count (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz, what the speech endpoint expects
            channels: 1,        // Mono
        }
    }
}

/// Audio capture backend trait
///
/// One backend holds at most one active capture session. `start()` while
/// already capturing is rejected, `stop()` while idle is a no-op.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Begin capturing from the input device
    async fn start(&mut self) -> Result<(), WorkflowError>;

    /// Finalize the capture and return the clip.
    ///
    /// Returns `None` when no capture was active.
    async fn stop(&mut self) -> Result<Option<AudioClip>, WorkflowError>;

    /// Check if a capture is currently active
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Microphone input via cpal
    Microphone,
    /// "Record" from a WAV file (tests, mic-less environments)
    Fixture(PathBuf),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    pub fn create(source: CaptureSource, config: CaptureConfig) -> Box<dyn CaptureBackend> {
        match source {
            CaptureSource::Microphone => {
                Box::new(super::microphone::MicrophoneCapture::new(config))
            }
            CaptureSource::Fixture(path) => Box::new(super::fixture::FixtureCapture::new(path)),
        }
    }
}
