use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use su_recorder::playback::{AvailabilityCheck, HeadAvailabilityCheck};
use su_recorder::store::{RecordingStore, StoreClient};
use su_recorder::transcribe::{Transcriber, TranscriptionClient};
use su_recorder::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "su-recorder", about = "Voice recording collection service")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(short, long, default_value = "config/su-recorder")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.http.bind, cfg.service.http.port
    );
    info!("Speech endpoint: {}", cfg.transcription.endpoint);
    info!("Store: {}", cfg.store.base_url);

    let store: Arc<dyn RecordingStore> = Arc::new(StoreClient::new(
        cfg.store.base_url.clone(),
        cfg.store.api_key.clone(),
    )?);

    let transcriber: Arc<dyn Transcriber> = Arc::new(TranscriptionClient::new(
        cfg.transcription.endpoint.clone(),
        cfg.transcription.timeout_secs,
    )?);

    let checker: Arc<dyn AvailabilityCheck> = Arc::new(HeadAvailabilityCheck::new(5)?);

    let bind = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let state = AppState::new(Arc::new(cfg), store, transcriber, checker);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!("Listening on {}", bind);

    axum::serve(listener, router).await?;

    Ok(())
}
