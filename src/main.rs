//! Status Crawler main entry point
//!
//! This is the command-line interface for the same-host link health checker.

use anyhow::Context;
use clap::{Parser, Subcommand};
use status_crawler::config::{
    load_config_with_hash, Config, PositionalOverrides, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_RATE_INTERVAL, DEFAULT_REQUESTS_PER_HOST,
};
use status_crawler::output::stats::write_summary;
use status_crawler::{CrawlError, Crawler, Reporter};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Status Crawler: a same-host link health checker
///
/// Crawls every page reachable from a URL without leaving its host and
/// reports the HTTP status of each one as it is fetched.
#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(version)]
#[command(about = "A same-host link health checker", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and report the status of every page on its host
    #[command(allow_negative_numbers = true)]
    Status {
        /// Seed URL
        url: String,

        /// Maximum number of fetches in flight
        #[arg(value_name = "MAX_CONCURRENCY")]
        max_concurrency: Option<String>,

        /// Requests allowed per host in each interval
        #[arg(value_name = "REQUESTS_PER_HOST")]
        requests_per_host: Option<String>,

        /// Length of the rate limit interval, e.g. 30s or 1m30s
        #[arg(value_name = "RATE_INTERVAL")]
        rate_interval: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let Some(Command::Status {
        url,
        max_concurrency,
        requests_per_host,
        rate_interval,
    }) = cli.command
    else {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    };

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    PositionalOverrides {
        max_concurrency: max_concurrency.as_deref(),
        requests_per_host: requests_per_host.as_deref(),
        rate_interval: rate_interval.as_deref(),
    }
    .apply(&mut config.crawler);

    handle_status(&config, &url).await
}

/// Runs the crawl and prints the report as results arrive
async fn handle_status(config: &Config, url: &str) -> anyhow::Result<ExitCode> {
    let crawler = Crawler::from_config(config)?;

    let started = Instant::now();
    let (stream, completion) = match crawler.start(url) {
        Ok(started) => started,
        Err(e @ (CrawlError::InvalidSeed { .. } | CrawlError::MissingHost { .. })) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let mut reporter = Reporter::new(io::stdout());
    reporter.banner(url)?;
    reporter.header(url)?;

    // Draining stops early on a write error; the crawl then winds down on its own
    let drained = reporter.drain(stream).await;
    let stats = completion.wait().await?;
    let summary = drained.context("Failed to write report")?;

    write_summary(&mut io::stdout(), &summary, &stats, started.elapsed())?;

    Ok(ExitCode::SUCCESS)
}

fn print_usage() {
    println!("Usage:");
    println!("  crawler status <url> [maxConcurrency] [requestsPerHost] [rateInterval]");
    println!(
        "Defaults: maxConcurrency={}, requestsPerHost={}, rateInterval={:?}",
        DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUESTS_PER_HOST, DEFAULT_RATE_INTERVAL
    );
    println!();
    println!("Options:");
    println!("  -c, --config <CONFIG>  Path to TOML configuration file");
    println!("  -v, --verbose...       Increase logging verbosity");
    println!("  -q, --quiet            Suppress non-error log output");
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
/// overrides the verbosity flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "status_crawler=info,warn",
            1 => "status_crawler=debug,info",
            2 => "status_crawler=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_status_positionals_are_optional() {
        let cli = Cli::try_parse_from(["crawler", "status", "https://example.com"]).unwrap();
        match cli.command {
            Some(Command::Status {
                url,
                max_concurrency,
                requests_per_host,
                rate_interval,
            }) => {
                assert_eq!(url, "https://example.com");
                assert!(max_concurrency.is_none());
                assert!(requests_per_host.is_none());
                assert!(rate_interval.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_status_accepts_unparsable_numbers() {
        let cli = Cli::try_parse_from([
            "crawler",
            "status",
            "https://example.com",
            "lots",
            "-5",
            "1m30s",
        ])
        .unwrap();
        let Some(Command::Status {
            max_concurrency,
            requests_per_host,
            rate_interval,
            ..
        }) = cli.command
        else {
            panic!("expected status command");
        };
        assert_eq!(max_concurrency.as_deref(), Some("lots"));
        assert_eq!(requests_per_host.as_deref(), Some("-5"));
        assert_eq!(rate_interval.as_deref(), Some("1m30s"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crawler",
            "status",
            "https://example.com",
            "-vv",
            "--config",
            "crawler.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("crawler.toml")));
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["crawler"]).unwrap();
        assert!(cli.command.is_none());
    }
}
