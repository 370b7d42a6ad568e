//! Terminal outcomes for pages claimed during a crawl
//!
//! Every page that wins a claim ends in exactly one of these outcomes. Only
//! `Recorded` pages appear in the result map.

use serde::Serialize;
use std::fmt;

/// Represents how the crawl finished with a claimed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOutcome {
    // ===== Success =====
    /// Page was fetched, extracted and stored
    Recorded,

    // ===== Fetch failures =====
    /// Page answered with a status above 399
    DeadLink,

    /// Page could not be reached (connection, DNS, TLS or timeout error)
    Unreachable,

    /// Page Content-Type is not HTML
    ContentMismatch,

    // ===== Cancellation =====
    /// Cancellation fired while waiting for a permit or mid-fetch
    Cancelled,

    /// Body arrived, but cancellation fired before it could be stored
    Discarded,
}

impl PageOutcome {
    /// Returns true if the page failed on its own account
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DeadLink | Self::Unreachable | Self::ContentMismatch
        )
    }

    /// Returns true if the budget running out stopped this page
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Discarded)
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::Cancelled => "cancelled",
            Self::Discarded => "discarded",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
