use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub transcription: TranscriptionConfig,
    pub store: StoreConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Where the per-installation device token is cached
    pub device_id_path: String,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionConfig {
    /// Speech recognition endpoint (multipart POST)
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the hosted data store (REST/RPC)
    pub base_url: String,
    pub api_key: String,
    /// Prompts fetched per session
    pub prompt_batch_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between availability checks, in milliseconds
    pub poll_interval_ms: u64,
    /// Retry budget for the availability poll
    pub max_attempts: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
