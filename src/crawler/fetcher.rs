//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the crawler's user agent and timeouts
//! - Cancellable GET requests for page content
//! - Status and Content-Type validation
//! - Error classification into page outcomes

use crate::config::CrawlConfig;
use crate::state::PageOutcome;
use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a single page fetch produced no body
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, timeout or body read failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status above 399
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// The response is not an HTML document
    #[error("Got non-HTML response: {0:?}")]
    ContentType(String),

    /// Cancellation fired before the response completed
    #[error("Fetch aborted")]
    Cancelled,
}

impl FetchError {
    /// Maps the failure to the outcome recorded for the page
    pub fn outcome(&self) -> PageOutcome {
        match self {
            Self::Network(_) => PageOutcome::Unreachable,
            Self::HttpStatus(_) => PageOutcome::DeadLink,
            Self::ContentType(_) => PageOutcome::ContentMismatch,
            Self::Cancelled => PageOutcome::Cancelled,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawl configuration (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use site_ripple::config::CrawlConfig;
/// use site_ripple::crawler::build_http_client;
///
/// let config = CrawlConfig::new("https://blog.boot.dev", 5, 10);
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, aborting as soon as `cancel` fires
///
/// # Request Flow
///
/// 1. Send GET request (redirects followed by the client)
/// 2. Reject statuses above 399
/// 3. Reject responses whose Content-Type does not contain `text/html`
/// 4. Read the body as text
///
/// Cancellation drops the in-flight request, closing the transfer instead of
/// letting it run to completion. An already fired token means no request is
/// sent at all.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `cancel` - The crawl's cancellation token
///
/// # Returns
///
/// The page body, or the reason there is none
pub async fn fetch_html(
    client: &Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<String, FetchError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        result = get_html(client, url) => result,
    }
}

async fn get_html(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if status.as_u16() > 399 {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Media types are case-insensitive
    if !content_type.to_ascii_lowercase().contains("text/html") {
        return Err(FetchError::ContentType(content_type));
    }

    Ok(response.text().await?)
}
