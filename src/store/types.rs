use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question or phrase shown to the contributor to elicit a spoken response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub prompt_audio_url: Option<String>,
}

/// Row written for an accepted recording.
///
/// Field names are the external insert contract; do not rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecording {
    pub user_id: String,
    pub question_id: i64,
    pub province_id: i64,
    pub audio_url: String,
    /// Whole seconds, floor-rounded
    pub audio_duration: i64,
    pub audio_script: String,
    pub age: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Service-wide settings row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub maintenance_mode: bool,
    #[serde(default)]
    pub maintenance_message: Option<String>,
}

/// Contributor identity threaded into persisted rows.
///
/// Authentication happens elsewhere; callers hand these over when opening a
/// session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub user_id: String,
    pub province_id: i64,
    pub age: u32,
}
