//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the task forest of one crawl:
//! - Spawning a task per discovered same-host link
//! - Bounding simultaneous fetches with a semaphore
//! - Stopping dispatch once the page budget is exhausted
//! - Collecting the recorded pages into the final report

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{build_http_client, fetch_html, FetchError};
use crate::crawler::parser::extract_page_data;
use crate::state::{ClaimOutcome, CrawlState, PageMap, PageOutcome};
use crate::url::{normalized_key, parse_with_default_scheme, same_host, with_default_scheme};
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Links handed back by a finished crawl task; None if it recorded nothing
type TaskResult = Option<Vec<String>>;

/// Everything a crawl task needs, shared behind one `Arc`
struct Shared {
    client: Client,
    state: CrawlState,
    limiter: Semaphore,
    seed: Url,
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL as the crawl requested it
    pub seed_url: String,

    /// Recorded pages, keyed by normalized URL
    pub pages: PageMap,

    /// How every claimed page ended
    pub outcomes: HashMap<PageOutcome, u64>,

    /// Number of distinct pages claimed
    pub claimed: usize,

    /// Whether the page budget ran out and cancelled the crawl
    pub budget_exhausted: bool,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    shared: Arc<Shared>,
    seed_url: String,
    max_concurrency: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// `max_pages` and `max_concurrency` below one are clamped up to one.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The seed URL is malformed or the HTTP client failed to build
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let seed = parse_with_default_scheme(&config.seed_url)?;
        let seed_url = with_default_scheme(&config.seed_url).into_owned();
        let client = build_http_client(&config)?;
        let max_concurrency = config.max_concurrency.max(1);

        Ok(Self {
            shared: Arc::new(Shared {
                client,
                state: CrawlState::new(config.max_pages),
                limiter: Semaphore::new(max_concurrency),
                seed,
            }),
            seed_url,
            max_concurrency,
        })
    }

    /// Runs the crawl until every spawned task has finished
    ///
    /// Each finished task hands back the outgoing links of its page, which
    /// are dispatched as new tasks unless the crawl has been cancelled in the
    /// meantime. Page failures are recovered inside the tasks, so the crawl
    /// itself always completes.
    pub async fn run(self) -> CrawlReport {
        let state = &self.shared.state;
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} concurrent requests)",
            self.seed_url,
            state.max_pages(),
            self.max_concurrency
        );

        let start_time = Instant::now();
        let mut tasks: JoinSet<TaskResult> = JoinSet::new();
        self.dispatch(&mut tasks, self.seed_url.clone());

        while let Some(joined) = tasks.join_next().await {
            let links = match joined {
                Ok(Some(links)) => links,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!("Crawl task aborted: {}", e);
                    continue;
                }
            };

            for link in links {
                if state.is_cancelled() {
                    tracing::debug!("Crawl cancelled, not dispatching remaining links");
                    break;
                }
                self.dispatch(&mut tasks, link);
            }
        }

        let report = CrawlReport {
            seed_url: self.seed_url.clone(),
            pages: state.take_pages(),
            outcomes: state.outcome_counts(),
            claimed: state.visited_count(),
            budget_exhausted: state.is_cancelled(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages recorded, {} claimed in {:?}",
            report.pages.len(),
            report.claimed,
            report.elapsed
        );

        report
    }

    /// Spawns a crawl task for `link` if it is an http(s) URL on the seed's host
    fn dispatch(&self, tasks: &mut JoinSet<TaskResult>, link: String) {
        if self.shared.state.is_cancelled() {
            return;
        }

        let url = match Url::parse(&link) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping malformed link {}: {}", link, e);
                return;
            }
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            tracing::trace!("Skipping non-HTTP link {}", link);
            return;
        }

        if !same_host(&url, &self.shared.seed) {
            tracing::trace!("Skipping off-site link {}", link);
            return;
        }

        tasks.spawn(crawl_page(Arc::clone(&self.shared), url, link));
    }
}

/// Crawls a single page
///
/// # Task Flow
///
/// 1. Bail out if the crawl is cancelled
/// 2. Claim the normalized key (budget, dedup and cancellation in one step)
/// 3. Wait for a fetch permit, giving up if cancellation fires first
/// 4. Fetch the body; the permit is released when this step ends
/// 5. Drop the body if cancellation fired meanwhile
/// 6. Extract and record the page, returning its outgoing links
async fn crawl_page(shared: Arc<Shared>, url: Url, link: String) -> TaskResult {
    let state = &shared.state;
    if state.is_cancelled() {
        return None;
    }

    let key = normalized_key(&url);
    match state.claim(&key) {
        ClaimOutcome::Claimed => {}
        outcome => {
            tracing::trace!("Not crawling {}: {:?}", key, outcome);
            return None;
        }
    }

    let cancel = state.cancellation_token();
    let body = {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                state.record_outcome(PageOutcome::Cancelled);
                return None;
            }
            permit = shared.limiter.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    state.record_outcome(PageOutcome::Cancelled);
                    return None;
                }
            },
        };

        tracing::debug!("Fetching {}", link);
        match fetch_html(&shared.client, url.as_str(), cancel).await {
            Ok(body) => body,
            Err(FetchError::Cancelled) => {
                tracing::debug!("Fetch of {} aborted by cancellation", link);
                state.record_outcome(PageOutcome::Cancelled);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", link, e);
                state.record_outcome(e.outcome());
                return None;
            }
        }
    };

    if state.is_cancelled() {
        state.record_outcome(PageOutcome::Discarded);
        return None;
    }

    let record = extract_page_data(&body, &link);
    let links = record.outgoing_links.clone();

    if !state.record_page(key, record) {
        return None;
    }

    Some(links)
}

/// Runs a complete crawl from a configuration
///
/// # Example
///
/// ```no_run
/// use site_ripple::config::CrawlConfig;
/// use site_ripple::crawler::run_crawl;
///
/// # async fn example() -> Result<(), site_ripple::CrawlError> {
/// let report = run_crawl(CrawlConfig::new("https://blog.boot.dev", 5, 20)).await?;
/// println!("{} pages in {:?}", report.pages.len(), report.elapsed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
