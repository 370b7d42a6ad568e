//! URL handling module for Site-Ripple
//!
//! This module provides seed parsing, dedup-key normalization and the host
//! comparison that keeps a crawl on the seed's site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, same_host};
pub use normalize::{normalize_url, normalized_key, parse_with_default_scheme};

pub(crate) use normalize::with_default_scheme;
