//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a fixed timeout and user agent
//! - Reporting redirects as their own status instead of following them
//! - Reading the body only when the page can be expanded
//! - Error classification

use crate::config::HttpConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::future::Future;
use thiserror::Error;

/// Reasons a fetch produced no usable response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Body of a fetched page, as far as link extraction is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    /// The response cannot be expanded, so the body was never read
    Skipped,

    /// Page markup ready for link extraction
    Text(String),

    /// The response was expandable but its body could not be read
    Unreadable(FetchError),
}

/// Response metadata of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code (3xx included, redirects are not followed)
    pub status_code: u16,

    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// Page body for link extraction
    pub body: PageBody,
}

/// Issues a single GET for a URL
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Returns true if a Content-Type header denotes an HTML document
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Returns true if links should be extracted from a response
///
/// Error statuses are never expanded. With `html_only`, neither is anything
/// whose Content-Type isn't HTML.
pub fn is_expandable(status_code: u16, content_type: &str, html_only: bool) -> bool {
    status_code < 400 && (!html_only || is_html(content_type))
}

/// Builds an HTTP client with proper configuration
///
/// The client never follows redirects and applies the configured timeout to
/// the whole request, body included.
///
/// # Example
///
/// ```no_run
/// use status_crawler::config::HttpConfig;
/// use status_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    html_only: bool,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &HttpConfig, html_only: bool) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?, html_only))
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client, html_only: bool) -> Self {
        Self { client, html_only }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = if is_expandable(status_code, &content_type, self.html_only) {
            match response.text().await {
                Ok(text) => PageBody::Text(text),
                Err(e) => PageBody::Unreadable(e.into()),
            }
        } else {
            PageBody::Skipped
        };

        Ok(FetchResponse {
            status_code,
            content_type,
            body,
        })
    }
}
