//! Lifecycle of a single crawl task
//!
//! A task is created for a URL only after that URL has been claimed.

use std::fmt;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// URL has been claimed and is waiting for a rate-limit token or fetch slot
    Claimed,

    /// Fetch has returned, with a response or an error
    Fetched,

    // ===== Terminal States =====
    /// Page was parsed and its links were offered to the registry
    Expanded,

    /// Nothing followed the fetch (error, error status, non-HTML, unreadable body)
    Terminal,
}

impl TaskState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expanded | Self::Terminal)
    }

    /// Returns true if the transition from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Claimed, Self::Fetched)
                | (Self::Fetched, Self::Expanded)
                | (Self::Fetched, Self::Terminal)
        )
    }

    /// Moves to `next`, keeping the current state if the transition is not allowed
    pub fn advance(self, next: TaskState) -> TaskState {
        if self.can_transition_to(next) {
            next
        } else {
            tracing::warn!("Invalid task state transition: {} -> {}", self, next);
            self
        }
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::Fetched => "fetched",
            Self::Expanded => "expanded",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
