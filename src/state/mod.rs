//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TaskState`: lifecycle of one crawl task (claimed, fetched, expanded or terminal)
//! - `HostBucket`: per-host token budget used by the rate limiter

mod host_state;
mod task_state;

// Re-export main types
pub use host_state::HostBucket;
pub use task_state::TaskState;
