//! Per-URL crawl results carried from the workers to the reporter

use crate::crawler::fetcher::{is_html, FetchError};

/// What a fetch of one URL came back with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server answered, with any status including 3xx and errors
    Response {
        status_code: u16,
        content_type: String,
    },

    /// No response was obtained
    Failed(FetchError),
}

/// Reachability of one visited URL
///
/// Exactly one result is produced per claimed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub url: String,
    pub outcome: Outcome,
}

impl CrawlResult {
    /// HTTP status code, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match &self.outcome {
            Outcome::Response { status_code, .. } => Some(*status_code),
            Outcome::Failed(_) => None,
        }
    }

    /// Content-Type of the response, if a response was received
    pub fn content_type(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Response { content_type, .. } => Some(content_type),
            Outcome::Failed(_) => None,
        }
    }

    /// The fetch error, if no response was received
    pub fn error(&self) -> Option<&FetchError> {
        match &self.outcome {
            Outcome::Failed(e) => Some(e),
            Outcome::Response { .. } => None,
        }
    }

    /// True for a response with a status below 400
    pub fn is_success(&self) -> bool {
        self.status_code().is_some_and(|code| code < 400)
    }

    /// True for an HTML response
    pub fn is_html(&self) -> bool {
        self.content_type().is_some_and(is_html)
    }
}
