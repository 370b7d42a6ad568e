//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering the page map as pretty-printed JSON
//! - Summarizing a crawl as statistics

pub mod stats;

pub use stats::{format_statistics, print_statistics, CrawlStatistics};

use crate::state::PageMap;

/// Renders the page map as pretty-printed JSON, keyed by normalized URL
pub fn render_json(pages: &PageMap) -> serde_json::Result<String> {
    serde_json::to_string_pretty(pages)
}
