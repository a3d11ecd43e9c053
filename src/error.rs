use thiserror::Error;

/// Errors surfaced by the recording workflow.
///
/// Every variant is recoverable: the workflow returns to its nearest stable
/// state and the caller decides whether to retry the step or start over.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Microphone access was refused by the host.
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    /// No usable audio input device exists.
    #[error("no audio input device available")]
    DeviceUnavailable,

    /// A capture session is already running.
    #[error("capture already active")]
    CaptureActive,

    /// The transcription call failed (transport, server error, or empty clip).
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    /// The confirmation clip never became fetchable within the retry budget.
    #[error("confirmation audio not available after {attempts} attempts")]
    PlaybackUnavailable { attempts: u32 },

    /// The recording insert call failed.
    #[error("failed to persist recording: {0}")]
    PersistenceFailed(String),

    /// The prompt batch could not be fetched.
    #[error("failed to fetch prompts: {0}")]
    PromptFetchFailed(String),

    /// The service is in maintenance mode; no new sessions.
    #[error("service under maintenance: {0}")]
    Maintenance(String),

    /// An operation was called in a state that does not allow it.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}
