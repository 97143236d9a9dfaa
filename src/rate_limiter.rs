//! Minimum-spacing gate in front of the primary provider.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Enforces a minimum interval between the starts of consecutive calls.
///
/// A single instance is shared by every request type. The lock is held
/// across the wait, so callers are admitted one at a time in arrival order
/// and no two callers can claim the same slot.
#[derive(Debug)]
pub struct RateLimiter {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter that admits one call per `min_interval`.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    /// Waits until the next slot is free and claims it.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "rate limiter delaying provider call"
                );
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    /// Configured spacing.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
