//! Bounded polling shared by the drive and port waiters

use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Timing for a bounded poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before the first check
    pub grace: Duration,
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            grace: Duration::ZERO,
            interval,
            timeout,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Found,
    TimedOut,
}

impl PollOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PollOutcome::Found)
    }
}

/// Check `predicate` every `interval` until it returns true or `timeout` elapses.
///
/// The timeout clock starts after the grace period. A check is only started
/// while elapsed < timeout, so a miss returns no earlier than `timeout` and no
/// later than `timeout + interval` (plus the duration of the last check).
pub async fn poll<F, Fut>(config: PollConfig, mut predicate: F) -> PollOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = bool>,
{
    if !config.grace.is_zero() {
        sleep(config.grace).await;
    }

    let start = Instant::now();
    let mut attempt = 0u32;
    while start.elapsed() < config.timeout {
        attempt += 1;
        if predicate(attempt).await {
            log::trace!("poll succeeded on attempt {}", attempt);
            return PollOutcome::Found;
        }
        sleep(config.interval).await;
    }

    log::debug!(
        "poll timed out after {} attempts ({:?})",
        attempt,
        config.timeout
    );
    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_found_on_third_attempt() {
        let outcome = poll(
            PollConfig::new(Duration::from_secs(5), Duration::from_millis(500)),
            |attempt| async move { attempt == 3 },
        )
        .await;
        assert_eq!(outcome, PollOutcome::Found);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds() {
        let config = PollConfig::new(Duration::from_millis(2000), Duration::from_millis(300));
        let start = Instant::now();
        let outcome = poll(config, |_| async { false }).await;
        let elapsed = start.elapsed();

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert!(elapsed >= config.timeout);
        assert!(elapsed <= config.timeout + config.interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_precedes_first_check() {
        let start = Instant::now();
        let config = PollConfig::new(Duration::from_secs(1), Duration::from_millis(100))
            .with_grace(Duration::from_millis(300));
        let outcome = poll(config, |_| {
            let waited = start.elapsed();
            async move { waited >= Duration::from_millis(300) }
        })
        .await;
        assert_eq!(outcome, PollOutcome::Found);
    }
}
