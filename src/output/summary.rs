//! End-of-run crawl summary
//!
//! Built from the crawl state at finalization and dumped through the log sink.

use crate::output::section_break;
use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Aggregate statistics of a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    // Run metadata
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,

    // Counters
    pub pages_explored: u64,
    pub pages_sampled: u64,
    pub urls_visited: usize,
    pub urls_blacklisted: usize,
    pub unique_domains: usize,

    // Sampled pages per value, most frequent first
    pub languages: Vec<(String, u64)>,
    pub countries: Vec<(String, u64)>,
}

impl CrawlSummary {
    /// Snapshots the crawl state
    pub fn from_state(state: &CrawlState) -> Self {
        let elapsed = state.stats.started_at.elapsed();
        let finished_at = Utc::now();
        let started_at = chrono::Duration::from_std(elapsed)
            .map(|d| finished_at - d)
            .unwrap_or(finished_at);

        Self {
            started_at,
            finished_at,
            elapsed_secs: elapsed.as_secs_f64(),
            pages_explored: state.stats.pages_explored,
            pages_sampled: state.stats.pages_sampled,
            urls_visited: state.tracker.visited_count(),
            urls_blacklisted: state.tracker.blacklisted_count(),
            unique_domains: state.rarity.domains().len(),
            languages: ranked(state.rarity.languages()),
            countries: ranked(state.rarity.countries()),
        }
    }

    /// Percentage of explored pages that were sampled
    pub fn sample_rate(&self) -> f64 {
        if self.pages_explored == 0 {
            0.0
        } else {
            (self.pages_sampled as f64 / self.pages_explored as f64) * 100.0
        }
    }
}

fn ranked(counts: &HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Writes the summary to the log sink
pub fn log_summary(summary: &CrawlSummary) {
    section_break();
    tracing::info!("Crawl finished");
    tracing::info!("Elapsed time: {:.2}s", summary.elapsed_secs);
    tracing::info!("Pages explored: {}", summary.pages_explored);
    tracing::info!("Pages sampled: {}", summary.pages_sampled);
    tracing::info!(
        "URLs visited: {}, blacklisted: {}, unique domains: {}",
        summary.urls_visited,
        summary.urls_blacklisted,
        summary.unique_domains
    );

    section_break();
    tracing::info!("Languages sampled:");
    for (language, count) in &summary.languages {
        tracing::info!("  {}: {}", language, count);
    }

    section_break();
    tracing::info!("Countries sampled:");
    for (country, count) in &summary.countries {
        tracing::info!("  {}: {}", country, count);
    }
    section_break();
}
