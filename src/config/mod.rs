//! Configuration module for Site-Ripple
//!
//! A crawl is configured entirely from command-line arguments; this module
//! holds the typed configuration and its validation rules.
//!
//! # Example
//!
//! ```
//! use site_ripple::config::{validate, CrawlConfig};
//!
//! let config = CrawlConfig::new("https://blog.boot.dev", 5, 50);
//! validate(&config).unwrap();
//! assert_eq!(config.user_agent.header_value(), "BootCrawler/1.0");
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{CrawlConfig, UserAgentConfig, DEFAULT_CRAWLER_NAME, DEFAULT_CRAWLER_VERSION};

// Re-export validation
pub use validation::validate;
