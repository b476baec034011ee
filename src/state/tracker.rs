//! Visited-set and blacklist bookkeeping
//!
//! Both sets only ever grow during a run.

use crate::url::Signature;
use std::collections::HashSet;

/// Tracks which URLs were already enqueued and which are permanently excluded
#[derive(Debug, Default)]
pub struct VisitTracker {
    /// Signatures of every URL pushed to any frontier
    visited: HashSet<Signature>,

    /// URLs that produced a fatal fetch outcome
    blacklist: HashSet<String>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a signature as visited
    pub fn mark_visited(&mut self, signature: Signature) {
        self.visited.insert(signature);
    }

    pub fn is_visited(&self, signature: Signature) -> bool {
        self.visited.contains(&signature)
    }

    /// Permanently excludes a URL
    pub fn blacklist(&mut self, url: &str) {
        if self.blacklist.insert(url.to_string()) {
            tracing::debug!("Blacklisted {}", url);
        }
    }

    pub fn is_blacklisted(&self, url: &str) -> bool {
        self.blacklist.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn blacklisted_count(&self) -> usize {
        self.blacklist.len()
    }
}
