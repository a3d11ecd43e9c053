pub mod audio;
pub mod config;
pub mod device;
pub mod error;
pub mod http;
pub mod playback;
pub mod store;
pub mod transcribe;
pub mod workflow;

pub use audio::{
    AudioClip, CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource,
    FixtureCapture, MicrophoneCapture,
};
pub use config::Config;
pub use device::DeviceId;
pub use error::WorkflowError;
pub use http::{create_router, AppState};
pub use playback::{AvailabilityCheck, AvailabilityPoller, HeadAvailabilityCheck, PollOutcome};
pub use store::{Contributor, NewRecording, Prompt, RecordingStore, StoreClient, StoreSettings};
pub use transcribe::{Transcriber, TranscriptResult, TranscriptionClient};
pub use workflow::{
    AdvanceInfo, FinishOutcome, PromptQueue, RecordingWorkflow, ReviewInfo, SessionStats,
    WorkflowState,
};
