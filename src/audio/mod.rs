pub mod backend;
pub mod clip;
pub mod fixture;
pub mod microphone;

pub use backend::{CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource};
pub use clip::AudioClip;
pub use fixture::FixtureCapture;
pub use microphone::MicrophoneCapture;
