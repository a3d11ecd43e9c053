use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a workflow session, served by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current workflow state name
    pub state: String,

    /// When the session was opened
    pub started_at: DateTime<Utc>,

    /// Prompts in this session's batch
    pub prompts_total: usize,

    /// Prompts with a persisted recording
    pub prompts_completed: usize,

    /// Retries consumed by the most recent availability poll
    pub last_poll_attempts: u32,
}
