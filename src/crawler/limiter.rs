//! Per-host request pacing
//!
//! Each host gets a [`HostBucket`] holding `requests_per_host` tokens that is
//! restored in full once every `rate_interval`. A request that finds the
//! bucket empty polls until the next reset.

use crate::config::CrawlerConfig;
use crate::state::HostBucket;
use crate::url::host_key;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// How long a blocked caller sleeps before checking its host bucket again
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Hard-reset token bucket limiter keyed by host
///
/// Buckets are created lazily, full, on the first request to a host and live
/// as long as the limiter. The lock is only held for the check-and-consume
/// step, never while sleeping, so blocked hosts don't stall other hosts.
/// Callers waiting on the same host are admitted in no particular order.
#[derive(Debug)]
pub struct HostRateLimiter {
    hosts: Mutex<HashMap<String, HostBucket>>,
    quota: u32,
    interval: Duration,
    poll_interval: Duration,
}

impl HostRateLimiter {
    /// Creates a limiter admitting `quota` requests per host every `interval`
    pub fn new(quota: u32, interval: Duration) -> Self {
        Self {
            hosts: Mutex::new(HashMap::new()),
            quota,
            interval,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Creates a limiter from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.requests_per_host, config.rate_interval)
    }

    /// Overrides the polling interval used while a host is exhausted
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Waits until a request to the URL's host is permitted, then consumes a token
    ///
    /// URLs without a parsable host are admitted immediately.
    pub async fn wait(&self, url: &str) {
        let Some(host) = host_key(url) else {
            tracing::trace!("No host in {}, skipping rate limit", url);
            return;
        };

        loop {
            match self.try_acquire(&host, Instant::now()) {
                Ok(()) => {
                    tracing::trace!("Rate limiter admitted request to {}", host);
                    return;
                }
                Err(reset_in) => {
                    tracing::trace!(
                        "Rate limit reached for {}, window resets in {:?}, retrying in {:?}",
                        host,
                        reset_in,
                        self.poll_interval
                    );
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Tokens left for a host in its current window, if the host has been seen
    pub fn remaining(&self, url: &str) -> Option<u32> {
        let host = host_key(url)?;
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts.get(&host).map(|bucket| bucket.tokens)
    }

    /// Consumes a token for `host`, or returns the time left in its window
    fn try_acquire(&self, host: &str, now: Instant) -> Result<(), Duration> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let bucket = hosts
            .entry(host.to_string())
            .or_insert_with(|| HostBucket::new(self.quota, now));

        if bucket.try_acquire(self.quota, self.interval, now) {
            Ok(())
        } else {
            Err(bucket.time_until_reset(self.interval, now))
        }
    }
}
