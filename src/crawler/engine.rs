//! Crawl engine - concurrent discovery and fetching
//!
//! Every claimed URL becomes its own tokio task which:
//! 1. Waits for a rate-limit token for its host
//! 2. Takes a slot from the concurrency gate and fetches, releasing the slot
//!    as soon as the fetch returns
//! 3. Sends its result down the bounded result stream
//! 4. For an expandable page, extracts links and spawns a task for every
//!    same-host link it manages to claim
//!
//! Tasks are counted by a [`WorkTracker`]. The engine keeps the only strong
//! handle on the result stream and drops it once the count reaches zero, so
//! the stream closes exactly when the last task has finished.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{is_expandable, Fetcher, HttpFetcher, PageBody};
use crate::crawler::limiter::HostRateLimiter;
use crate::crawler::parser::extract_links;
use crate::crawler::registry::VisitationRegistry;
use crate::crawler::result::{CrawlResult, Outcome};
use crate::crawler::tracker::WorkTracker;
use crate::state::TaskState;
use crate::url::{extract_domain, is_same_host};
use crate::CrawlError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use url::Url;

/// Receiving end of the result stream
pub type ResultStream = mpsc::Receiver<CrawlResult>;

/// Counts gathered over a whole crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs fetched (one result each)
    pub visited: usize,

    /// Pages whose links were extracted
    pub expanded: usize,

    /// Pages that ended without expansion
    pub terminal: usize,

    /// Same-host links claimed and scheduled
    pub scheduled: usize,

    /// Links skipped for pointing to another host
    pub off_host: usize,
}

#[derive(Debug, Default)]
struct StatsCounters {
    visited: AtomicUsize,
    expanded: AtomicUsize,
    terminal: AtomicUsize,
    scheduled: AtomicUsize,
    off_host: AtomicUsize,
}

impl StatsCounters {
    fn record_finished(&self, state: TaskState) {
        if !state.is_terminal() {
            tracing::warn!("Task finished while still {}", state);
        }
        match state {
            TaskState::Expanded => self.expanded.fetch_add(1, Ordering::Relaxed),
            _ => self.terminal.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            visited: self.visited.load(Ordering::Relaxed),
            expanded: self.expanded.load(Ordering::Relaxed),
            terminal: self.terminal.load(Ordering::Relaxed),
            scheduled: self.scheduled.load(Ordering::Relaxed),
            off_host: self.off_host.load(Ordering::Relaxed),
        }
    }
}

/// State shared by every task of one crawl
struct CrawlContext<F> {
    seed: Url,
    fetcher: Arc<F>,
    registry: VisitationRegistry,
    limiter: Option<HostRateLimiter>,
    gate: Semaphore,
    results: mpsc::WeakSender<CrawlResult>,
    tracker: Arc<WorkTracker>,
    stats: Arc<StatsCounters>,
    html_only: bool,
}

impl<F: Fetcher> CrawlContext<F> {
    /// Sends a result to the reporter; false if nobody is listening anymore
    async fn emit(&self, result: CrawlResult) -> bool {
        match self.results.upgrade() {
            Some(sender) => sender.send(result).await.is_ok(),
            None => false,
        }
    }
}

/// Resolves with the crawl statistics once the result stream has closed
#[derive(Debug)]
pub struct CrawlCompletion {
    handle: JoinHandle<CrawlStats>,
}

impl CrawlCompletion {
    /// Waits for every task to finish
    pub async fn wait(self) -> Result<CrawlStats, CrawlError> {
        Ok(self.handle.await?)
    }
}

/// Same-host crawler
///
/// # Example
///
/// ```no_run
/// use status_crawler::config::Config;
/// use status_crawler::crawler::Crawler;
///
/// # async fn example() -> Result<(), status_crawler::CrawlError> {
/// let crawler = Crawler::from_config(&Config::default())?;
/// let (mut results, completion) = crawler.start("https://example.com/")?;
/// while let Some(result) = results.recv().await {
///     println!("{} {:?}", result.url, result.status_code());
/// }
/// let stats = completion.wait().await?;
/// println!("visited {} URLs", stats.visited);
/// # Ok(())
/// # }
/// ```
pub struct Crawler<F> {
    config: CrawlerConfig,
    fetcher: Arc<F>,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler that fetches over HTTP with the configured client
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config.http, config.crawler.html_only)?;
        Ok(Self::new(config.crawler.clone(), fetcher))
    }
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler around any fetcher
    pub fn new(config: CrawlerConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
        }
    }

    /// Starts crawling from `seed` in the background
    ///
    /// Must be called within a tokio runtime. The seed is validated first;
    /// if it is not an absolute URL with a host, nothing is scheduled.
    ///
    /// # Returns
    ///
    /// * `Ok((ResultStream, CrawlCompletion))` - The stream yields one result
    ///   per visited URL in completion order and closes when the crawl ends
    /// * `Err(CrawlError)` - The seed URL is unusable
    pub fn start(&self, seed: &str) -> Result<(ResultStream, CrawlCompletion), CrawlError> {
        let seed_url = Url::parse(seed).map_err(|source| CrawlError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;
        if extract_domain(&seed_url).is_none() {
            return Err(CrawlError::MissingHost {
                url: seed.to_string(),
            });
        }

        let (sender, receiver) = mpsc::channel(self.config.result_buffer.max(1));
        let tracker = WorkTracker::new();
        let stats = Arc::new(StatsCounters::default());

        let context = Arc::new(CrawlContext {
            seed: seed_url.clone(),
            fetcher: Arc::clone(&self.fetcher),
            registry: VisitationRegistry::new(),
            limiter: self
                .config
                .rate_limit
                .then(|| HostRateLimiter::from_config(&self.config)),
            gate: Semaphore::new(self.config.max_concurrent.max(1)),
            results: sender.downgrade(),
            tracker: Arc::clone(&tracker),
            stats: Arc::clone(&stats),
            html_only: self.config.html_only,
        });

        tracing::info!(
            "Starting crawl of {} (max concurrent: {}, rate limit: {})",
            seed_url,
            self.config.max_concurrent,
            if self.config.rate_limit {
                format!(
                    "{} per {:?}",
                    self.config.requests_per_host, self.config.rate_interval
                )
            } else {
                "off".to_string()
            }
        );

        let seed_key = seed_url.to_string();
        context.registry.claim(&seed_key);
        spawn_task(&context, seed_key);

        let handle = tokio::spawn(async move {
            tracker.wait_idle().await;
            // The last strong sender: dropping it closes the stream
            drop(sender);
            let stats = stats.snapshot();
            tracing::info!(
                "Crawl finished: {} visited, {} expanded, {} off-host links skipped",
                stats.visited,
                stats.expanded,
                stats.off_host
            );
            stats
        });

        Ok((receiver, CrawlCompletion { handle }))
    }

    /// Runs a whole crawl and collects every result
    pub async fn run(&self, seed: &str) -> Result<(Vec<CrawlResult>, CrawlStats), CrawlError> {
        let (mut stream, completion) = self.start(seed)?;
        let mut results = Vec::new();
        while let Some(result) = stream.recv().await {
            results.push(result);
        }
        let stats = completion.wait().await?;
        Ok((results, stats))
    }
}

/// Registers a task for `url` and spawns it
fn spawn_task<F: Fetcher>(context: &Arc<CrawlContext<F>>, url: String) {
    let guard = context.tracker.begin();
    let context = Arc::clone(context);
    tokio::spawn(async move {
        let _guard = guard;
        visit(context, url).await;
    });
}

/// Processes one claimed URL from rate limiting to expansion
async fn visit<F: Fetcher>(context: Arc<CrawlContext<F>>, url: String) {
    let mut state = TaskState::Claimed;

    if let Some(limiter) = &context.limiter {
        limiter.wait(&url).await;
    }

    let fetched = {
        let Ok(_permit) = context.gate.acquire().await else {
            tracing::error!("Concurrency gate closed, dropping {}", url);
            return;
        };
        tracing::debug!("Fetching {}", url);
        context.fetcher.fetch(&url).await
    };
    state = state.advance(TaskState::Fetched);
    context.stats.visited.fetch_add(1, Ordering::Relaxed);

    let (outcome, body) = match fetched {
        Ok(response) => (
            Outcome::Response {
                status_code: response.status_code,
                content_type: response.content_type,
            },
            response.body,
        ),
        Err(e) => {
            tracing::debug!("Fetch failed for {}: {}", url, e);
            (Outcome::Failed(e), PageBody::Skipped)
        }
    };

    let expandable = match &outcome {
        Outcome::Response {
            status_code,
            content_type,
        } => is_expandable(*status_code, content_type, context.html_only),
        Outcome::Failed(_) => false,
    };

    let result = CrawlResult {
        url: url.clone(),
        outcome,
    };
    if !context.emit(result).await {
        tracing::debug!("Result stream closed, not expanding {}", url);
        context.stats.record_finished(state.advance(TaskState::Terminal));
        return;
    }

    let next = match body {
        PageBody::Text(html) if expandable => match expand(&context, &url, &html) {
            Ok(scheduled) => {
                tracing::debug!("Expanded {}: {} new links", url, scheduled);
                TaskState::Expanded
            }
            Err(e) => {
                tracing::warn!("Error getting links from {}: {}", url, e);
                TaskState::Terminal
            }
        },
        PageBody::Unreadable(e) if expandable => {
            tracing::warn!("Error getting links from {}: {}", url, e);
            TaskState::Terminal
        }
        _ => TaskState::Terminal,
    };

    state = state.advance(next);
    tracing::trace!("Task for {} ended {}", url, state);
    context.stats.record_finished(state);
}

/// Claims and schedules the same-host links of a page
///
/// Returns the number of links newly scheduled.
fn expand<F: Fetcher>(
    context: &Arc<CrawlContext<F>>,
    page_url: &str,
    html: &str,
) -> Result<usize, CrawlError> {
    let links = extract_links(html, page_url)?;
    let mut scheduled = 0;

    for link in links {
        if !is_same_host(&context.seed, &link) {
            tracing::trace!("Skipping off-host link {}", link);
            context.stats.off_host.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        if context.registry.claim(&link) {
            spawn_task(context, link);
            scheduled += 1;
        }
    }

    context.stats.scheduled.fetch_add(scheduled, Ordering::Relaxed);
    Ok(scheduled)
}
