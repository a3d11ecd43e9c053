use crate::error::WorkflowError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Existence probe for a remote resource.
///
/// An `Err` counts the same as "not there yet"; the poller retries either
/// way within its budget.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    async fn exists(&self, url: &str) -> Result<bool>;
}

/// Metadata-only probe via HTTP HEAD
pub struct HeadAvailabilityCheck {
    client: reqwest::Client,
}

impl HeadAvailabilityCheck {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AvailabilityCheck for HeadAvailabilityCheck {
    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().is_success())
    }
}

/// How a poll ended short of failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The resource answered an existence check; `url` is the exact
    /// (cache-busted) variant that passed and can be handed to playback.
    Available { url: String, attempts: u32 },
    /// A newer recording superseded this poll before it finished.
    Superseded,
}

/// Fixed-budget, fixed-interval availability poll.
///
/// The confirmation clip is rendered asynchronously server-side, so the URL
/// returned by the transcription call may 404 for a while. This polls until
/// the clip exists or the budget runs out. No backoff, no jitter.
///
/// Supersession: `supersede()` bumps a generation counter; a poll started
/// under an older generation terminates at its next tick without touching
/// newer state. Each poll starts from a fresh attempt count.
pub struct AvailabilityPoller {
    checker: Arc<dyn AvailabilityCheck>,
    interval: Duration,
    max_attempts: u32,
    generation: Arc<AtomicU64>,
}

impl AvailabilityPoller {
    pub fn new(checker: Arc<dyn AvailabilityCheck>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            checker,
            interval,
            max_attempts,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidate any in-flight poll (a new recording is taking over)
    pub fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Poll `url` until it exists, the budget is exhausted, or a newer
    /// recording supersedes this poll.
    pub async fn poll(&self, url: &str) -> Result<PollOutcome, WorkflowError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let mut attempts: u32 = 0;
        let mut current_url = url.to_string();

        loop {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!("Availability poll superseded before check {}", attempts);
                return Ok(PollOutcome::Superseded);
            }

            match self.checker.exists(&current_url).await {
                Ok(true) => {
                    info!(attempts, "Confirmation audio available");
                    return Ok(PollOutcome::Available {
                        url: current_url,
                        attempts,
                    });
                }
                Ok(false) => {
                    debug!(attempts, "Confirmation audio not yet available");
                }
                Err(e) => {
                    warn!(attempts, "Availability check failed: {}", e);
                }
            }

            attempts += 1;
            if attempts >= self.max_attempts {
                warn!(attempts, "Availability poll budget exhausted");
                return Err(WorkflowError::PlaybackUnavailable { attempts });
            }

            tokio::time::sleep(self.interval).await;

            // The sleep may outlive the result it was scheduled for; a stale
            // tick must not issue further checks.
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!("Availability poll superseded during wait");
                return Ok(PollOutcome::Superseded);
            }

            current_url = cache_busted(url, attempts);
        }
    }
}

/// Rewrite `url` with a fresh cache-busting token. The token embeds the
/// attempt ordinal so two rewrites within one millisecond still differ.
fn cache_busted(url: &str, attempt: u32) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}cb={}-{}",
        url,
        sep,
        chrono::Utc::now().timestamp_millis(),
        attempt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_busted_appends_query() {
        let url = cache_busted("https://example.com/clip.wav", 1);
        assert!(url.starts_with("https://example.com/clip.wav?cb="));
        assert!(url.ends_with("-1"));
    }

    #[test]
    fn cache_busted_extends_existing_query() {
        let url = cache_busted("https://example.com/clip.wav?id=7", 3);
        assert!(url.starts_with("https://example.com/clip.wav?id=7&cb="));
        assert!(url.ends_with("-3"));
    }
}
