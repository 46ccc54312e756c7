use crate::config::parser::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

/// Default number of fetches allowed in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default number of requests admitted per host in each rate interval
pub const DEFAULT_REQUESTS_PER_HOST: u32 = 30;

/// Default length of a rate-limit window
pub const DEFAULT_RATE_INTERVAL: Duration = Duration::from_secs(30);

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
}

/// Crawl engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent fetches
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Requests admitted per host in each rate interval
    #[serde(rename = "requests-per-host")]
    pub requests_per_host: u32,

    /// Length of the rate-limit window (e.g. "30s", "1m30s")
    #[serde(rename = "rate-interval", deserialize_with = "deserialize_duration")]
    pub rate_interval: Duration,

    /// Whether per-host rate limiting is applied at all
    #[serde(rename = "rate-limit")]
    pub rate_limit: bool,

    /// Only expand pages whose Content-Type is HTML
    #[serde(rename = "html-only")]
    pub html_only: bool,

    /// Capacity of the result stream between the workers and the reporter
    #[serde(rename = "result-buffer")]
    pub result_buffer: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENCY,
            requests_per_host: DEFAULT_REQUESTS_PER_HOST,
            rate_interval: DEFAULT_RATE_INTERVAL,
            rate_limit: true,
            html_only: true,
            result_buffer: 1,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout applied to each request
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("status-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
