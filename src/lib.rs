//! Site-Ripple: a bounded, single-host web crawler
//!
//! This crate crawls a website from a seed URL, staying on the seed's host,
//! and extracts the first heading, first paragraph, outgoing links and image
//! references of every page it visits. The number of distinct pages and the
//! number of requests in flight are both bounded.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Ripple operations
///
/// Individual page failures never surface here; they are recovered inside
/// the crawl and show up as [`state::PageOutcome`] values instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Ripple operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl_site, Coordinator, CrawlReport, PageMap, PageRecord};
pub use state::{CrawlState, PageOutcome};
pub use url::{normalize_url, normalized_key, parse_with_default_scheme, same_host};
