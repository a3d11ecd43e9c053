/// States of one prompt-response cycle.
///
/// `Idle → Recording → Transcribing → AwaitingPlayback → Reviewable →
/// Persisting → (Idle | Complete)`. Failures at a network-calling state
/// fall back to the prior stable state: transcription and playback
/// failures to `Idle`, persistence failures to `Reviewable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Waiting for the contributor to start recording
    Idle,
    /// Capture in progress
    Recording,
    /// Clip submitted to the speech endpoint
    Transcribing,
    /// Polling for the confirmation clip
    AwaitingPlayback,
    /// Transcript ready for the contributor to accept or discard
    Reviewable,
    /// Insert call in flight
    Persisting,
    /// Every prompt in the queue has a persisted recording
    Complete,
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Recording => "recording",
            WorkflowState::Transcribing => "transcribing",
            WorkflowState::AwaitingPlayback => "awaiting_playback",
            WorkflowState::Reviewable => "reviewable",
            WorkflowState::Persisting => "persisting",
            WorkflowState::Complete => "complete",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
