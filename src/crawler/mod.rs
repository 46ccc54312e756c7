//! Crawler module for discovering and checking same-host pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without redirect following
//! - HTML parsing and link extraction
//! - Exactly-once URL claiming and per-host rate limiting
//! - The concurrent crawl engine and its result stream

mod engine;
mod fetcher;
mod limiter;
mod parser;
mod registry;
mod result;
mod tracker;

pub use engine::{CrawlCompletion, CrawlStats, Crawler, ResultStream};
pub use fetcher::{
    build_http_client, is_expandable, is_html, FetchError, FetchResponse, Fetcher, HttpFetcher,
    PageBody,
};
pub use limiter::{HostRateLimiter, POLL_INTERVAL};
pub use parser::extract_links;
pub use registry::VisitationRegistry;
pub use result::{CrawlResult, Outcome};
pub use tracker::{WorkGuard, WorkTracker};

use crate::config::Config;
use crate::CrawlError;

/// Crawls everything reachable from `seed` and collects the results
///
/// Convenience wrapper around [`Crawler::from_config`] and [`Crawler::run`]
/// for callers that don't need streaming.
pub async fn crawl(config: &Config, seed: &str) -> Result<(Vec<CrawlResult>, CrawlStats), CrawlError> {
    Crawler::from_config(config)?.run(seed).await
}
