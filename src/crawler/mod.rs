//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Cancellable HTTP fetching
//! - HTML parsing into page records
//! - Bounded-concurrency crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_html, FetchError};
pub use parser::{
    extract_page_data, get_first_paragraph, get_heading, get_images, get_urls, PageRecord,
};

pub use crate::state::PageMap;

use crate::config::CrawlConfig;
use crate::CrawlError;

/// Crawls a site and returns the recorded pages
///
/// This is the main library entry point. It will:
/// 1. Parse the seed URL (a missing scheme means `http`)
/// 2. Crawl every reachable page on the seed's host
/// 3. Stop once `max_pages` distinct pages have been claimed
/// 4. Keep at most `max_concurrency` requests in flight
///
/// Limits below one are clamped up to one.
///
/// # Returns
///
/// * `Ok(PageMap)` - Recorded pages keyed by normalized URL
/// * `Err(CrawlError)` - The seed URL is malformed
pub async fn crawl_site(
    seed_url: &str,
    max_pages: usize,
    max_concurrency: usize,
) -> Result<PageMap, CrawlError> {
    let report = run_crawl(CrawlConfig::new(seed_url, max_concurrency, max_pages)).await?;
    Ok(report.pages)
}
