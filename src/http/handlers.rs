use super::state::AppState;
use crate::audio::{CaptureBackendFactory, CaptureConfig, CaptureSource};
use crate::device::DeviceId;
use crate::error::WorkflowError;
use crate::playback::AvailabilityPoller;
use crate::store::{Contributor, Prompt};
use crate::workflow::{FinishOutcome, RecordingWorkflow};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub user_id: String,
    pub province_id: i64,
    pub age: u32,
}

#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
    pub prompts_total: usize,
    pub prompt: Option<Prompt>,
}

#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn status_for(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::PermissionDenied(_)
        | WorkflowError::DeviceUnavailable
        | WorkflowError::CaptureActive
        | WorkflowError::InvalidState { .. } => StatusCode::CONFLICT,
        WorkflowError::TranscriptionFailed(_)
        | WorkflowError::PlaybackUnavailable { .. }
        | WorkflowError::PersistenceFailed(_)
        | WorkflowError::PromptFetchFailed(_) => StatusCode::BAD_GATEWAY,
        WorkflowError::Maintenance(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn workflow_error(error: WorkflowError) -> axum::response::Response {
    error!("Workflow error: {}", error);
    (
        status_for(&error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn session_not_found(session_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

/// POST /sessions
/// Open a new recording session: check maintenance mode, fetch the prompt
/// batch, and create the workflow.
pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> impl IntoResponse {
    match state.store.fetch_settings().await {
        Ok(settings) if settings.maintenance_mode => {
            let message = settings
                .maintenance_message
                .unwrap_or_else(|| "maintenance in progress".to_string());
            return workflow_error(WorkflowError::Maintenance(message));
        }
        Ok(_) => {}
        Err(e) => return workflow_error(e),
    }

    let prompts = match state
        .store
        .fetch_prompts(state.config.store.prompt_batch_size)
        .await
    {
        Ok(prompts) => prompts,
        Err(e) => return workflow_error(e),
    };

    let device_id = match DeviceId::load_or_create(&state.config.service.device_id_path) {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to derive device id: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to derive device id: {}", e),
                }),
            )
                .into_response();
        }
    };

    let capture = CaptureBackendFactory::create(
        CaptureSource::Microphone,
        CaptureConfig {
            sample_rate: state.config.audio.sample_rate,
            channels: state.config.audio.channels,
        },
    );

    let poller = AvailabilityPoller::new(
        Arc::clone(&state.checker),
        Duration::from_millis(state.config.playback.poll_interval_ms),
        state.config.playback.max_attempts,
    );

    let workflow = RecordingWorkflow::new(
        Contributor {
            user_id: req.user_id,
            province_id: req.province_id,
            age: req.age,
        },
        device_id,
        prompts,
        capture,
        Arc::clone(&state.transcriber),
        poller,
        Arc::clone(&state.store),
    );

    let session_id = format!("session-{}", uuid::Uuid::new_v4());
    let prompts_total = workflow.stats().prompts_total;
    let prompt = workflow.current_prompt().cloned();

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(workflow)));
    }

    info!("Session opened: {} ({} prompts)", session_id, prompts_total);

    (
        StatusCode::OK,
        Json(OpenSessionResponse {
            session_id,
            prompts_total,
            prompt,
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/record/start
pub async fn start_recording(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let workflow = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    let workflow = match workflow {
        Some(w) => w,
        None => return session_not_found(&session_id),
    };

    let outcome = workflow.lock().await.begin_recording().await;

    match outcome {
        Ok(()) => (
            StatusCode::OK,
            Json(StartRecordingResponse {
                session_id,
                status: "recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => workflow_error(e),
    }
}

/// POST /sessions/:session_id/record/stop
/// Finalize the capture, transcribe it, and wait for the confirmation clip.
pub async fn stop_recording(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let workflow = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    let workflow = match workflow {
        Some(w) => w,
        None => return session_not_found(&session_id),
    };

    let outcome = workflow.lock().await.finish_recording().await;

    match outcome {
        Ok(FinishOutcome::Reviewable(review)) => (StatusCode::OK, Json(review)).into_response(),
        Ok(FinishOutcome::Superseded) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "superseded by a newer recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => workflow_error(e),
    }
}

/// POST /sessions/:session_id/accept
/// Persist the reviewed transcript and advance to the next prompt.
pub async fn accept_recording(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let workflow = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    let workflow = match workflow {
        Some(w) => w,
        None => return session_not_found(&session_id),
    };

    let result = workflow.lock().await.accept().await;

    match result {
        Ok(advance) => (StatusCode::OK, Json(advance)).into_response(),
        Err(e) => workflow_error(e),
    }
}

/// POST /sessions/:session_id/discard
pub async fn discard_recording(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let workflow = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    let workflow = match workflow {
        Some(w) => w,
        None => return session_not_found(&session_id),
    };

    let outcome = workflow.lock().await.discard();

    match outcome {
        Ok(()) => (
            StatusCode::OK,
            Json(StartRecordingResponse {
                session_id,
                status: "idle".to_string(),
            }),
        )
            .into_response(),
        Err(e) => workflow_error(e),
    }
}

/// GET /sessions/:session_id/status
pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let workflow = {
        let sessions = state.sessions.read().await;
        sessions.get(&session_id).cloned()
    };

    match workflow {
        Some(w) => {
            let stats = w.lock().await.stats();
            (StatusCode::OK, Json(stats)).into_response()
        }
        None => session_not_found(&session_id),
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
