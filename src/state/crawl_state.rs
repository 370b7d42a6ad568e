//! Shared state for one crawl invocation
//!
//! The visited set, the page budget, the result map and the outcome counters
//! all live behind a single mutex so that every check-then-act sequence is
//! atomic across concurrent crawl tasks. The cancellation token lives next to
//! them and is only ever fired from inside that critical section.

use crate::crawler::PageRecord;
use crate::state::PageOutcome;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// Result map of a crawl, keyed by normalized URL
pub type PageMap = BTreeMap<String, PageRecord>;

/// Answer to a claim attempt for a normalized key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The caller now owns the key and may fetch it
    Claimed,

    /// The crawl was already cancelled
    Cancelled,

    /// This attempt found the budget exhausted and fired cancellation
    BudgetExhausted,

    /// Another task already claimed the key
    Duplicate,
}

#[derive(Debug, Default)]
struct Inner {
    visited: HashSet<String>,
    pages: PageMap,
    outcomes: HashMap<PageOutcome, u64>,
}

/// Orchestrator-owned state shared by every crawl task
#[derive(Debug)]
pub struct CrawlState {
    inner: Mutex<Inner>,
    cancel: CancellationToken,
    max_pages: usize,
}

impl CrawlState {
    /// Creates empty state for a crawl of at most `max_pages` pages
    ///
    /// A budget below one is clamped up to one.
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            cancel: CancellationToken::new(),
            max_pages: max_pages.max(1),
        }
    }

    /// The page budget after clamping
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Token observed by dispatch, permit waits and in-flight fetches
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns true once the budget has been exhausted
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // Tasks never panic while holding the lock, and the data stays consistent
    // even if one did, so a poisoned lock is simply taken over.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically claims `key` for fetching
    ///
    /// # Claim Order
    ///
    /// 1. Already cancelled → `Cancelled`
    /// 2. Budget exhausted → fire cancellation, `BudgetExhausted`
    /// 3. Key already visited → `Duplicate`
    /// 4. Otherwise insert the key → `Claimed`
    ///
    /// This is the only place cancellation is raised.
    pub fn claim(&self, key: &str) -> ClaimOutcome {
        let mut inner = self.lock();

        if self.cancel.is_cancelled() {
            return ClaimOutcome::Cancelled;
        }

        if inner.visited.len() >= self.max_pages {
            tracing::info!(
                "Reached maximum number of pages to crawl ({}), cancelling outstanding work",
                self.max_pages
            );
            self.cancel.cancel();
            return ClaimOutcome::BudgetExhausted;
        }

        if inner.visited.contains(key) {
            return ClaimOutcome::Duplicate;
        }

        inner.visited.insert(key.to_string());
        ClaimOutcome::Claimed
    }

    /// Stores the record of a claimed page
    ///
    /// Returns false, and stores nothing, if cancellation fired first. The
    /// page then counts as `Discarded`.
    pub fn record_page(&self, key: String, record: PageRecord) -> bool {
        let mut inner = self.lock();

        if self.cancel.is_cancelled() {
            *inner.outcomes.entry(PageOutcome::Discarded).or_default() += 1;
            return false;
        }

        inner.pages.entry(key).or_insert(record);
        *inner.outcomes.entry(PageOutcome::Recorded).or_default() += 1;
        true
    }

    /// Counts a claimed page that ended without a record
    pub fn record_outcome(&self, outcome: PageOutcome) {
        *self.lock().outcomes.entry(outcome).or_default() += 1;
    }

    /// Number of keys claimed so far
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of pages recorded so far
    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    /// Snapshot of the outcome counters
    pub fn outcome_counts(&self) -> HashMap<PageOutcome, u64> {
        self.lock().outcomes.clone()
    }

    /// Moves the accumulated pages out, leaving the map empty
    pub fn take_pages(&self) -> PageMap {
        std::mem::take(&mut self.lock().pages)
    }
}
