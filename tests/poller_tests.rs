// Integration tests for the availability-polling retry loop
//
// The confirmation clip is rendered asynchronously server-side; the poller
// retries existence checks within a fixed budget. These tests drive it with
// a scripted checker and verify the budget, cache busting, and the
// supersession guard.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use su_recorder::playback::{AvailabilityCheck, AvailabilityPoller, PollOutcome};
use su_recorder::WorkflowError;

/// Checker that misses a fixed number of times, then succeeds, recording
/// every URL it was asked about.
struct CountdownCheck {
    misses_remaining: AtomicU32,
    urls: Mutex<Vec<String>>,
}

impl CountdownCheck {
    fn new(misses: u32) -> Self {
        Self {
            misses_remaining: AtomicU32::new(misses),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn seen_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilityCheck for CountdownCheck {
    async fn exists(&self, url: &str) -> Result<bool> {
        self.urls.lock().unwrap().push(url.to_string());

        let remaining = self.misses_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.misses_remaining.store(remaining - 1, Ordering::SeqCst);
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

/// Checker that always errors (network failure counts as a miss)
struct FailingCheck {
    checks: AtomicU32,
}

#[async_trait]
impl AvailabilityCheck for FailingCheck {
    async fn exists(&self, _url: &str) -> Result<bool> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("connection refused")
    }
}

fn poller(checker: Arc<dyn AvailabilityCheck>, max_attempts: u32) -> AvailabilityPoller {
    AvailabilityPoller::new(checker, Duration::from_millis(1), max_attempts)
}

#[tokio::test]
async fn test_immediately_available_uses_no_retries() -> Result<()> {
    let checker = Arc::new(CountdownCheck::new(0));
    let poller = poller(checker.clone(), 25);

    let outcome = poller.poll("https://x/y.wav").await?;

    match outcome {
        PollOutcome::Available { url, attempts } => {
            assert_eq!(attempts, 0);
            // First check hits the original URL, no cache busting yet
            assert_eq!(url, "https://x/y.wav");
        }
        other => panic!("Expected Available, got {:?}", other),
    }

    assert_eq!(checker.seen_urls().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_available_on_fourth_check() -> Result<()> {
    let checker = Arc::new(CountdownCheck::new(3));
    let poller = poller(checker.clone(), 25);

    let outcome = poller.poll("https://x/y.wav").await?;

    match outcome {
        PollOutcome::Available { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("Expected Available, got {:?}", other),
    }

    let urls = checker.seen_urls();
    assert_eq!(urls.len(), 4);

    // First probe is the plain URL; every retry carries a fresh token
    assert_eq!(urls[0], "https://x/y.wav");
    for url in &urls[1..] {
        assert!(url.starts_with("https://x/y.wav?cb="), "unexpected url {}", url);
    }

    // Tokens are distinct across retries
    let mut unique = urls.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), urls.len());

    Ok(())
}

#[tokio::test]
async fn test_budget_exhaustion_stops_at_max_attempts() {
    let checker = Arc::new(CountdownCheck::new(u32::MAX));
    let poller = poller(checker.clone(), 25);

    let result = poller.poll("https://x/y.wav").await;

    match result {
        Err(WorkflowError::PlaybackUnavailable { attempts }) => assert_eq!(attempts, 25),
        other => panic!("Expected PlaybackUnavailable, got {:?}", other),
    }

    // Exactly 25 checks issued, never a 26th
    assert_eq!(checker.seen_urls().len(), 25);
}

#[tokio::test]
async fn test_check_errors_count_as_misses() {
    let checker = Arc::new(FailingCheck {
        checks: AtomicU32::new(0),
    });
    let poller = poller(checker.clone(), 5);

    let result = poller.poll("https://x/y.wav").await;

    match result {
        Err(WorkflowError::PlaybackUnavailable { attempts }) => assert_eq!(attempts, 5),
        other => panic!("Expected PlaybackUnavailable, got {:?}", other),
    }

    assert_eq!(checker.checks.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_fresh_poll_resets_attempt_count() -> Result<()> {
    let exhausted = Arc::new(CountdownCheck::new(u32::MAX));
    let poller_failed = poller(exhausted, 5);
    assert!(poller_failed.poll("https://x/y.wav").await.is_err());

    // A new poll (new transcript) starts from zero attempts
    let fresh = Arc::new(CountdownCheck::new(0));
    let poller_ok = poller(fresh, 5);
    match poller_ok.poll("https://x/z.wav").await? {
        PollOutcome::Available { attempts, .. } => assert_eq!(attempts, 0),
        other => panic!("Expected Available, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_supersede_terminates_in_flight_poll() -> Result<()> {
    let checker = Arc::new(CountdownCheck::new(u32::MAX));
    let poller = Arc::new(AvailabilityPoller::new(
        checker.clone(),
        Duration::from_millis(20),
        1000,
    ));

    let in_flight = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.poll("https://x/y.wav").await })
    };

    // Let a few ticks happen, then a "new recording" takes over
    tokio::time::sleep(Duration::from_millis(50)).await;
    poller.supersede();

    let outcome = in_flight.await??;
    assert_eq!(outcome, PollOutcome::Superseded);

    // The stale loop stops issuing checks after supersession
    let checks_at_supersede = checker.seen_urls().len();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(checker.seen_urls().len(), checks_at_supersede);

    Ok(())
}

#[tokio::test]
async fn test_poll_after_supersede_runs_under_new_generation() -> Result<()> {
    let checker = Arc::new(CountdownCheck::new(0));
    let poller = poller(checker, 5);

    // Supersession happened before this poll began; the new poll is current
    poller.supersede();

    match poller.poll("https://x/y.wav").await? {
        PollOutcome::Available { attempts, .. } => assert_eq!(attempts, 0),
        other => panic!("Expected Available, got {:?}", other),
    }

    Ok(())
}
