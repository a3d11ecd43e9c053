use crate::config::Config;
use crate::playback::AvailabilityCheck;
use crate::store::RecordingStore;
use crate::transcribe::Transcriber;
use crate::workflow::RecordingWorkflow;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared application state for HTTP handlers.
///
/// The store, transcriber, and availability checker are shared across
/// sessions; each session gets its own workflow (and capture backend)
/// behind a mutex.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Active workflow sessions (session_id → workflow)
    pub sessions: Arc<RwLock<HashMap<String, Arc<Mutex<RecordingWorkflow>>>>>,

    pub store: Arc<dyn RecordingStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub checker: Arc<dyn AvailabilityCheck>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn RecordingStore>,
        transcriber: Arc<dyn Transcriber>,
        checker: Arc<dyn AvailabilityCheck>,
    ) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            transcriber,
            checker,
        }
    }
}
