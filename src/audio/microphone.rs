use super::backend::{CaptureBackend, CaptureConfig};
use super::clip::AudioClip;
use crate::error::WorkflowError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{info, warn};

/// Microphone capture backend built on cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// for the lifetime of one capture. The thread drops the stream (releasing
/// the device handle) on every exit path: stop, startup failure, and
/// backend drop.
pub struct MicrophoneCapture {
    config: CaptureConfig,
    active: Option<ActiveCapture>,
}

struct ActiveCapture {
    stop_tx: mpsc::Sender<()>,
    thread: JoinHandle<()>,
    samples: Arc<Mutex<Vec<i16>>>,
    sample_rate: u32,
    channels: u16,
}

impl MicrophoneCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Runs on the capture thread: acquire the device, run the stream until
    /// the stop signal arrives, then drop it.
    fn capture_thread(
        ready_tx: tokio::sync::oneshot::Sender<Result<(u32, u16), WorkflowError>>,
        stop_rx: mpsc::Receiver<()>,
        samples: Arc<Mutex<Vec<i16>>>,
    ) {
        let host = cpal::default_host();

        let device = match host.default_input_device() {
            Some(d) => d,
            None => {
                let _ = ready_tx.send(Err(WorkflowError::DeviceUnavailable));
                return;
            }
        };

        let supported = match device.default_input_config() {
            Ok(c) => c,
            Err(e) => {
                let _ = ready_tx.send(Err(WorkflowError::PermissionDenied(e.to_string())));
                return;
            }
        };

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        let err_fn = |e: cpal::StreamError| warn!("Capture stream error: {}", e);

        let stream = match sample_format {
            cpal::SampleFormat::I16 => {
                let samples = Arc::clone(&samples);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut buf) = samples.lock() {
                            buf.extend_from_slice(data);
                        }
                    },
                    err_fn,
                    None,
                )
            }
            cpal::SampleFormat::F32 => {
                let samples = Arc::clone(&samples);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut buf) = samples.lock() {
                            buf.extend(
                                data.iter()
                                    .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                            );
                        }
                    },
                    err_fn,
                    None,
                )
            }
            other => {
                warn!("Unsupported input sample format: {:?}", other);
                let _ = ready_tx.send(Err(WorkflowError::DeviceUnavailable));
                return;
            }
        };

        let stream = match stream {
            Ok(s) => s,
            Err(cpal::BuildStreamError::DeviceNotAvailable) => {
                let _ = ready_tx.send(Err(WorkflowError::DeviceUnavailable));
                return;
            }
            Err(e) => {
                let _ = ready_tx.send(Err(WorkflowError::PermissionDenied(e.to_string())));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready_tx.send(Err(WorkflowError::PermissionDenied(e.to_string())));
            return;
        }

        if ready_tx.send(Ok((sample_rate, channels))).is_err() {
            // Caller went away before capture came up; release the device.
            return;
        }

        // Block until stop() signals or the backend is dropped.
        let _ = stop_rx.recv();
        drop(stream);
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneCapture {
    async fn start(&mut self) -> Result<(), WorkflowError> {
        if self.active.is_some() {
            return Err(WorkflowError::CaptureActive);
        }

        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let samples = Arc::new(Mutex::new(Vec::new()));

        let thread_samples = Arc::clone(&samples);
        let thread = std::thread::spawn(move || {
            Self::capture_thread(ready_tx, stop_rx, thread_samples);
        });

        let (sample_rate, channels) = match ready_rx.await {
            Ok(Ok(negotiated)) => negotiated,
            Ok(Err(e)) => {
                // Thread has already released the device and exited.
                let _ = tokio::task::spawn_blocking(move || thread.join()).await;
                return Err(e);
            }
            Err(_) => {
                let _ = tokio::task::spawn_blocking(move || thread.join()).await;
                return Err(WorkflowError::DeviceUnavailable);
            }
        };

        info!(
            "Microphone capture started: {}Hz, {} channels (requested {}Hz/{})",
            sample_rate, channels, self.config.sample_rate, self.config.channels
        );

        self.active = Some(ActiveCapture {
            stop_tx,
            thread,
            samples,
            sample_rate,
            channels,
        });

        Ok(())
    }

    async fn stop(&mut self) -> Result<Option<AudioClip>, WorkflowError> {
        let active = match self.active.take() {
            Some(a) => a,
            None => return Ok(None), // stop without start is a no-op
        };

        // Signal the capture thread to drop the stream, then wait for it.
        let _ = active.stop_tx.send(());
        let thread = active.thread;
        if let Ok(Err(_)) = tokio::task::spawn_blocking(move || thread.join()).await {
            warn!("Capture thread panicked");
        }

        let samples = match active.samples.lock() {
            Ok(mut buf) => std::mem::take(&mut *buf),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        let clip = AudioClip::from_samples(samples, active.sample_rate, active.channels);

        info!(
            "Microphone capture stopped: {:.1}s, {} samples",
            clip.duration_seconds(),
            clip.samples.len()
        );

        Ok(Some(clip))
    }

    fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        // Abandoned mid-capture: make sure the thread releases the device.
        if let Some(active) = self.active.take() {
            let _ = active.stop_tx.send(());
        }
    }
}
