use super::queue::PromptQueue;
use super::state::WorkflowState;
use super::stats::SessionStats;
use crate::audio::CaptureBackend;
use crate::device::DeviceId;
use crate::error::WorkflowError;
use crate::playback::{AvailabilityPoller, PollOutcome};
use crate::store::{Contributor, NewRecording, Prompt, RecordingStore};
use crate::transcribe::{Transcriber, TranscriptResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// A transcript waiting for the contributor's verdict
struct PendingReview {
    result: TranscriptResult,
    /// The cache-busted URL that passed the availability check
    playback_url: String,
    /// Clip length in whole seconds, floor-rounded
    duration_secs: i64,
}

/// What the contributor gets to review after a finished recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInfo {
    pub transcript_text: String,
    pub playback_url: String,
    pub poll_attempts: u32,
}

/// How `finish_recording` ended short of failure
#[derive(Debug, Clone)]
pub enum FinishOutcome {
    /// Transcript and confirmation clip are ready
    Reviewable(ReviewInfo),
    /// A newer recording superseded this one mid-poll
    Superseded,
}

/// Where the session stands after a successful accept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceInfo {
    pub complete: bool,
    pub next_prompt: Option<Prompt>,
    pub prompts_completed: usize,
}

/// Sequences one full prompt-response cycle and persists accepted results.
///
/// One instance per session; all steps within a cycle are awaited
/// sequentially, no step begins before its predecessor resolves. All
/// collaborators are injected so tests can substitute every seam.
pub struct RecordingWorkflow {
    contributor: Contributor,
    device_id: DeviceId,
    capture: Box<dyn CaptureBackend>,
    transcriber: Arc<dyn Transcriber>,
    poller: AvailabilityPoller,
    store: Arc<dyn RecordingStore>,
    queue: PromptQueue,
    state: WorkflowState,
    started_at: DateTime<Utc>,
    review: Option<PendingReview>,
    last_poll_attempts: u32,
}

impl RecordingWorkflow {
    pub fn new(
        contributor: Contributor,
        device_id: DeviceId,
        prompts: Vec<Prompt>,
        capture: Box<dyn CaptureBackend>,
        transcriber: Arc<dyn Transcriber>,
        poller: AvailabilityPoller,
        store: Arc<dyn RecordingStore>,
    ) -> Self {
        let queue = PromptQueue::new(prompts);
        let state = if queue.is_empty() {
            WorkflowState::Complete
        } else {
            WorkflowState::Idle
        };

        Self {
            contributor,
            device_id,
            capture,
            transcriber,
            poller,
            store,
            queue,
            state,
            started_at: Utc::now(),
            review: None,
            last_poll_attempts: 0,
        }
    }

    /// Start capturing a response to the current prompt.
    ///
    /// Allowed from `Idle` and from `Reviewable` (re-record); a pending
    /// review is discarded and any stale poll superseded. On capture
    /// failure the state is unchanged.
    pub async fn begin_recording(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Idle | WorkflowState::Reviewable => {}
            state => {
                return Err(WorkflowError::InvalidState {
                    operation: "start recording",
                    state: state.name(),
                })
            }
        }

        self.capture.start().await?;

        // The new recording owns the workflow now; anything scheduled for
        // the previous transcript must not fire.
        self.poller.supersede();
        self.review = None;
        self.state = WorkflowState::Recording;

        info!(
            prompt = self.queue.current().map(|p| p.id),
            "Recording started"
        );

        Ok(())
    }

    /// Stop capture, transcribe the clip, and poll for the confirmation
    /// clip. On success the workflow is `Reviewable`; transcription and
    /// playback failures return it to `Idle` with nothing kept.
    pub async fn finish_recording(&mut self) -> Result<FinishOutcome, WorkflowError> {
        if self.state != WorkflowState::Recording {
            return Err(WorkflowError::InvalidState {
                operation: "stop recording",
                state: self.state.name(),
            });
        }

        let clip = match self.capture.stop().await {
            Ok(Some(clip)) => clip,
            Ok(None) => {
                self.state = WorkflowState::Idle;
                return Err(WorkflowError::TranscriptionFailed(
                    "no audio captured".to_string(),
                ));
            }
            Err(e) => {
                self.state = WorkflowState::Idle;
                return Err(e);
            }
        };

        self.state = WorkflowState::Transcribing;

        let result = match self
            .transcriber
            .transcribe(&clip, self.device_id.as_str())
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("Transcription failed: {}", e);
                self.state = WorkflowState::Idle;
                return Err(e);
            }
        };

        self.state = WorkflowState::AwaitingPlayback;

        match self.poller.poll(&result.confirmation_audio_url).await {
            Ok(PollOutcome::Available { url, attempts }) => {
                self.last_poll_attempts = attempts;
                let info = ReviewInfo {
                    transcript_text: result.transcript_text.clone(),
                    playback_url: url.clone(),
                    poll_attempts: attempts,
                };
                self.review = Some(PendingReview {
                    duration_secs: clip.duration_whole_seconds(),
                    playback_url: url,
                    result,
                });
                self.state = WorkflowState::Reviewable;
                Ok(FinishOutcome::Reviewable(info))
            }
            Ok(PollOutcome::Superseded) => {
                info!("Recording superseded before playback became available");
                if self.state == WorkflowState::AwaitingPlayback {
                    self.state = WorkflowState::Idle;
                }
                Ok(FinishOutcome::Superseded)
            }
            Err(e) => {
                warn!("Confirmation playback unavailable: {}", e);
                if let WorkflowError::PlaybackUnavailable { attempts } = e {
                    self.last_poll_attempts = attempts;
                }
                self.state = WorkflowState::Idle;
                Err(e)
            }
        }
    }

    /// Persist the reviewed transcript and advance to the next prompt.
    ///
    /// On insert failure the workflow stays `Reviewable` with the same
    /// transcript, so the contributor can retry without re-recording; the
    /// cursor does not move.
    pub async fn accept(&mut self) -> Result<AdvanceInfo, WorkflowError> {
        let review = match (self.state, self.review.as_ref()) {
            (WorkflowState::Reviewable, Some(review)) => review,
            _ => {
                return Err(WorkflowError::InvalidState {
                    operation: "accept",
                    state: self.state.name(),
                })
            }
        };

        let prompt = self.queue.current().ok_or(WorkflowError::InvalidState {
            operation: "accept",
            state: self.state.name(),
        })?;

        let record = NewRecording {
            user_id: self.contributor.user_id.clone(),
            question_id: prompt.id,
            province_id: self.contributor.province_id,
            audio_url: review.playback_url.clone(),
            audio_duration: review.duration_secs,
            audio_script: review.result.transcript_text.clone(),
            age: self.contributor.age,
            recorded_at: Utc::now(),
        };

        self.state = WorkflowState::Persisting;

        match self.store.insert_recording(&record).await {
            Ok(()) => {
                self.review = None;
                self.queue.advance();
                self.state = if self.queue.is_exhausted() {
                    WorkflowState::Complete
                } else {
                    WorkflowState::Idle
                };

                info!(
                    completed = self.queue.completed(),
                    total = self.queue.len(),
                    "Recording accepted"
                );

                Ok(AdvanceInfo {
                    complete: self.state == WorkflowState::Complete,
                    next_prompt: self.queue.current().cloned(),
                    prompts_completed: self.queue.completed(),
                })
            }
            Err(e) => {
                warn!("Persist failed, keeping review for retry: {}", e);
                self.state = WorkflowState::Reviewable;
                Err(e)
            }
        }
    }

    /// Drop the pending review without persisting anything
    pub fn discard(&mut self) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Reviewable {
            return Err(WorkflowError::InvalidState {
                operation: "discard",
                state: self.state.name(),
            });
        }

        self.review = None;
        self.state = WorkflowState::Idle;
        Ok(())
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn current_prompt(&self) -> Option<&Prompt> {
        self.queue.current()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state.name().to_string(),
            started_at: self.started_at,
            prompts_total: self.queue.len(),
            prompts_completed: self.queue.completed(),
            last_poll_attempts: self.last_poll_attempts,
        }
    }
}
