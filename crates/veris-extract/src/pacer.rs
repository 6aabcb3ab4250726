//! Minimum-interval request pacing.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum interval between successive calls.
///
/// The first call to [`Pacer::wait`] returns immediately; each later call
/// sleeps just long enough that at least the configured interval has elapsed
/// since the previous one. Built on `tokio::time` so tests can drive it with
/// a paused clock instead of real waits.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Sleep until the minimum interval since the previous call has passed,
    /// then mark this call as the new reference point.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
