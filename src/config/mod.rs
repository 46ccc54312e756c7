//! Configuration module for the crawler
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then the positional arguments of the `status` command.
//!
//! # Example
//!
//! ```no_run
//! use status_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Requests per host: {}", config.crawler.requests_per_host);
//! ```

mod overrides;
mod parser;
mod types;
mod validation;

// Re-export types
pub use overrides::PositionalOverrides;
pub use types::{
    Config, CrawlerConfig, HttpConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_RATE_INTERVAL,
    DEFAULT_REQUESTS_PER_HOST, DEFAULT_TIMEOUT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_duration};
pub use validation::validate;
