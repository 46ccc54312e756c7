//! Output module for rendering the health status report
//!
//! This module handles:
//! - Formatting one status line per crawl result as it arrives
//! - Tallying results for the summary footer

mod report;
pub mod stats;

pub use report::{format_result, Reporter};
pub use stats::ReportSummary;
