//! Statistics generation from a finished crawl
//!
//! This module provides functionality for summarizing a [`CrawlReport`] and
//! rendering the summary for the terminal.

use crate::crawler::CrawlReport;
use crate::state::PageOutcome;
use crate::url::{parse_with_default_scheme, same_host};
use std::collections::HashMap;
use std::fmt::Write;
use std::time::Duration;
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of pages recorded
    pub total_pages: u64,

    /// Number of distinct pages claimed
    pub claimed_pages: u64,

    /// Count of claimed pages by outcome
    pub pages_by_outcome: HashMap<PageOutcome, u64>,

    /// Claimed pages that failed to fetch (dead, unreachable or not HTML)
    pub failed_pages: u64,

    /// Claimed pages dropped because the budget ran out
    pub cancelled_pages: u64,

    /// Total number of outgoing links across recorded pages
    pub total_links: u64,

    /// Outgoing links that stay on the seed's host
    pub same_site_links: u64,

    /// Total number of image references across recorded pages
    pub total_images: u64,

    /// Recorded pages without an `<h1>`
    pub pages_without_heading: u64,

    /// Whether the page budget cancelled the crawl
    pub budget_exhausted: bool,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Builds statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let seed = parse_with_default_scheme(&report.seed_url).ok();

        let mut total_links = 0;
        let mut same_site_links = 0;
        let mut total_images = 0;
        let mut pages_without_heading = 0;

        for page in report.pages.values() {
            total_links += page.outgoing_links.len() as u64;
            total_images += page.image_urls.len() as u64;

            if page.heading.is_empty() {
                pages_without_heading += 1;
            }

            if let Some(seed) = &seed {
                same_site_links += page
                    .outgoing_links
                    .iter()
                    .filter_map(|link| Url::parse(link).ok())
                    .filter(|link| same_host(link, seed))
                    .count() as u64;
            }
        }

        let count_where = |keep: fn(&PageOutcome) -> bool| -> u64 {
            report
                .outcomes
                .iter()
                .filter(|(outcome, _)| keep(outcome))
                .map(|(_, count)| count)
                .sum()
        };

        Self {
            total_pages: report.pages.len() as u64,
            claimed_pages: report.claimed as u64,
            pages_by_outcome: report.outcomes.clone(),
            failed_pages: count_where(PageOutcome::is_error),
            cancelled_pages: count_where(PageOutcome::is_cancelled),
            total_links,
            same_site_links,
            total_images,
            pages_without_heading,
            budget_exhausted: report.budget_exhausted,
            elapsed: report.elapsed,
        }
    }

    /// Share of claimed pages that were recorded, in percent
    pub fn success_rate(&self) -> f64 {
        if self.claimed_pages == 0 {
            return 0.0;
        }
        (self.total_pages as f64 / self.claimed_pages as f64) * 100.0
    }
}

/// Renders statistics as a human-readable block
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages recorded: {}", stats.total_pages);
    let _ = writeln!(out, "  Pages claimed: {}", stats.claimed_pages);
    let _ = writeln!(out, "  Pages failed: {}", stats.failed_pages);
    let _ = writeln!(out, "  Pages cancelled: {}", stats.cancelled_pages);
    let _ = writeln!(
        out,
        "  Links found: {} ({} on site)",
        stats.total_links, stats.same_site_links
    );
    let _ = writeln!(out, "  Images found: {}", stats.total_images);
    let _ = writeln!(out, "  Pages without heading: {}", stats.pages_without_heading);
    let _ = writeln!(
        out,
        "  Budget exhausted: {}",
        if stats.budget_exhausted { "yes" } else { "no" }
    );
    let _ = writeln!(out, "  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    let _ = writeln!(out);

    if !stats.pages_by_outcome.is_empty() {
        let _ = writeln!(out, "Pages by Outcome:");
        // Sort by count (descending), then by name for stable output
        let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
        outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (outcome, count) in outcome_counts {
            let _ = writeln!(out, "  {}: {}", outcome, count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} claimed pages recorded)",
        stats.success_rate(),
        stats.total_pages,
        stats.claimed_pages
    );

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
