//! Text rendering of crawl results

use crate::crawler::{is_html, CrawlResult, Outcome, ResultStream};
use crate::output::stats::ReportSummary;
use reqwest::StatusCode;
use std::io::{self, Write};

const SUCCESS_GLYPH: &str = "✓";
const FAILURE_GLYPH: &str = "✗";

/// Formats one result as a report line, without the trailing newline
///
/// Responses show a glyph, the padded URL, the status code with its reason
/// phrase and, for non-HTML responses, the content type. Fetch errors show
/// the error instead of a status.
pub fn format_result(result: &CrawlResult) -> String {
    match &result.outcome {
        Outcome::Failed(e) => format!("{} {:<50} Error: {}", FAILURE_GLYPH, result.url, e),
        Outcome::Response {
            status_code,
            content_type,
        } => {
            let glyph = if *status_code >= 400 {
                FAILURE_GLYPH
            } else {
                SUCCESS_GLYPH
            };
            let reason = StatusCode::from_u16(*status_code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("");
            let content_info = if is_html(content_type) {
                String::new()
            } else {
                format!(" ({})", content_type)
            };

            format!(
                "{} {:<50} Status: {} {}{}",
                glyph, result.url, status_code, reason, content_info
            )
        }
    }
}

/// Renders the health status report to a writer
pub struct Reporter<W> {
    out: W,
    summary: ReportSummary,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: ReportSummary::default(),
        }
    }

    /// Announces the crawl before any result arrives
    pub fn banner(&mut self, seed: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Starting deep health check of {}", seed)?;
        writeln!(self.out, "This may take a while depending on the site size...")?;
        self.out.flush()
    }

    pub fn header(&mut self, seed: &str) -> io::Result<()> {
        writeln!(self.out, "Health Status Report for {}", seed)?;
        writeln!(self.out, "=====================================")?;
        self.out.flush()
    }

    /// Writes one line for a result and counts it
    pub fn render(&mut self, result: &CrawlResult) -> io::Result<()> {
        self.summary.record(result);
        writeln!(self.out, "{}", format_result(result))?;
        self.out.flush()
    }

    /// Renders every result until the stream closes
    ///
    /// Lines appear in arrival order. On a write error the stream is
    /// dropped, which stops the crawl from expanding further.
    pub async fn drain(&mut self, mut stream: ResultStream) -> io::Result<ReportSummary> {
        while let Some(result) = stream.recv().await {
            self.render(&result)?;
        }
        Ok(self.summary)
    }

    /// Gives back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
