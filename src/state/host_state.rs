use std::time::Duration;
use tokio::time::Instant;

/// Request budget of a single host during a crawl
///
/// The bucket holds a whole quota of tokens that is restored in one step once
/// the rate interval has passed since the last reset. Between resets each
/// admitted request consumes one token and nothing leaks back.
#[derive(Debug, Clone)]
pub struct HostBucket {
    /// Requests still admissible in the current window
    pub tokens: u32,

    /// Start of the current window
    pub last_reset: Instant,
}

impl HostBucket {
    /// Creates a bucket holding a full quota, with its window starting at `now`
    pub fn new(quota: u32, now: Instant) -> Self {
        Self {
            tokens: quota,
            last_reset: now,
        }
    }

    /// Restores the full quota if at least `interval` has passed since the last reset
    ///
    /// Returns true when a refill happened.
    pub fn refill_if_due(&mut self, quota: u32, interval: Duration, now: Instant) -> bool {
        if now.duration_since(self.last_reset) >= interval {
            self.tokens = quota;
            self.last_reset = now;
            true
        } else {
            false
        }
    }

    /// Refills if due, then consumes one token if any remain
    ///
    /// # Returns
    ///
    /// * `true` - A token was consumed and the request may proceed
    /// * `false` - The quota for the current window is exhausted
    pub fn try_acquire(&mut self, quota: u32, interval: Duration, now: Instant) -> bool {
        self.refill_if_due(quota, interval, now);

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Time left until the next refill
    pub fn time_until_reset(&self, interval: Duration, now: Instant) -> Duration {
        interval.saturating_sub(now.duration_since(self.last_reset))
    }
}
