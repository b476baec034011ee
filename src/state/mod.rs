//! State module for tracking crawl progress
//!
//! All process-wide mutable state lives in one [`CrawlState`] value owned by the
//! coordinator and lent to the components that need it.
//!
//! # Components
//!
//! - `VisitTracker`: visited signatures and the permanent blacklist
//! - `RarityStats`: language/country/domain tallies of sampled pages
//! - `CrawlStats`: explored and sampled page counters

mod rarity;
mod tracker;

// Re-export main types
pub use rarity::{PageProfile, RarityStats, UNKNOWN};
pub use tracker::VisitTracker;

use std::time::Instant;

/// Aggregate page counters
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Candidates that reached the politeness gate
    pub pages_explored: u64,

    /// Pages successfully downloaded
    pub pages_sampled: u64,

    /// When the run started
    pub started_at: Instant,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            pages_explored: 0,
            pages_sampled: 0,
            started_at: Instant::now(),
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the crawl mutates while it runs
#[derive(Debug, Default)]
pub struct CrawlState {
    pub tracker: VisitTracker,
    pub rarity: RarityStats,
    pub stats: CrawlStats,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }
}
