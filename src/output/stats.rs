//! Report totals and the summary footer
//!
//! The reporter tallies every result it renders; the footer combines those
//! totals with the engine's own [`CrawlStats`].

use crate::crawler::{CrawlResult, CrawlStats};
use std::io::{self, Write};
use std::time::Duration;

/// Totals over the results rendered in one report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of result lines rendered
    pub total: usize,

    /// Responses with a status below 400
    pub successes: usize,

    /// Responses with a status of 400 or above
    pub http_errors: usize,

    /// URLs for which no response was obtained
    pub fetch_errors: usize,
}

impl ReportSummary {
    /// Counts one rendered result
    pub fn record(&mut self, result: &CrawlResult) {
        self.total += 1;
        match result.status_code() {
            Some(code) if code < 400 => self.successes += 1,
            Some(_) => self.http_errors += 1,
            None => self.fetch_errors += 1,
        }
    }

    /// Share of rendered results that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            (self.successes as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Writes the summary footer
///
/// # Arguments
///
/// * `out` - Destination of the report
/// * `summary` - Totals gathered by the reporter
/// * `stats` - Counts gathered by the engine
/// * `elapsed` - Wall time of the crawl
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &ReportSummary,
    stats: &CrawlStats,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Crawl Summary ===")?;
    writeln!(out, "  URLs checked: {}", summary.total)?;
    writeln!(
        out,
        "  Successful: {} ({:.1}%)",
        summary.successes,
        summary.success_rate()
    )?;
    writeln!(out, "  HTTP errors: {}", summary.http_errors)?;
    writeln!(out, "  Fetch errors: {}", summary.fetch_errors)?;
    writeln!(
        out,
        "  Pages expanded: {} (links scheduled: {}, off-host skipped: {})",
        stats.expanded, stats.scheduled, stats.off_host
    )?;
    writeln!(out, "  Elapsed: {:.2}s", elapsed.as_secs_f64())?;
    out.flush()
}
