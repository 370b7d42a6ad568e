use std::time::Duration;

/// Crawler name sent in the User-Agent header
pub const DEFAULT_CRAWLER_NAME: &str = "BootCrawler";

/// Crawler version sent in the User-Agent header
pub const DEFAULT_CRAWLER_VERSION: &str = "1.0";

/// Main configuration structure for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// URL the crawl starts from; its host bounds the crawl
    pub seed_url: String,

    /// Maximum number of fetches in flight at once
    pub max_concurrency: usize,

    /// Maximum number of distinct pages the crawl will visit
    pub max_pages: usize,

    /// Identification sent with every request
    pub user_agent: UserAgentConfig,

    /// Upper bound on a whole request, body included
    pub request_timeout: Duration,

    /// Upper bound on establishing a connection
    pub connect_timeout: Duration,
}

impl CrawlConfig {
    /// Creates a configuration with the default user agent and timeouts
    pub fn new(seed_url: impl Into<String>, max_concurrency: usize, max_pages: usize) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_concurrency,
            max_pages,
            user_agent: UserAgentConfig::default(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: DEFAULT_CRAWLER_NAME.to_string(),
            crawler_version: DEFAULT_CRAWLER_VERSION.to_string(),
        }
    }
}
