//! Recording workflow
//!
//! This module sequences one full prompt-response cycle:
//! - Capture a spoken response (audio backend)
//! - Transcribe it through the speech endpoint
//! - Poll until the confirmation clip is playable
//! - Let the contributor accept or discard
//! - Persist accepted recordings and advance the prompt cursor

mod controller;
mod queue;
mod state;
mod stats;

pub use controller::{AdvanceInfo, FinishOutcome, RecordingWorkflow, ReviewInfo};
pub use queue::PromptQueue;
pub use state::WorkflowState;
pub use stats::SessionStats;
