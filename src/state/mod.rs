//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited set, page budget, result map and cancellation token
//!   shared by every task of one crawl
//! - `PageOutcome`: how the crawl finished with each claimed page

mod crawl_state;
mod page_outcome;

// Re-export main types
pub use crawl_state::{ClaimOutcome, CrawlState, PageMap};
pub use page_outcome::PageOutcome;
