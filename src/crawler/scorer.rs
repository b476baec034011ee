//! Novelty scoring of candidate URLs
//!
//! A candidate is worth more the less its country, language and domain are
//! represented among the pages sampled so far. Country novelty weighs the most,
//! then language, then domain. A candidate that brings nothing new on any axis
//! falls back to the log of its size.

use crate::crawler::parser::parse_page;
use crate::crawler::pipeline::FetchPipeline;
use crate::crawler::profile::Profiler;
use crate::state::{CrawlState, PageProfile, RarityStats};

pub const COUNTRY_FACTOR: f64 = 10.0;
pub const LANGUAGE_FACTOR: f64 = 5.0;
pub const DOMAIN_FACTOR: f64 = 2.5;

/// Percentage of explored pages carrying a value (0 before anything is explored)
pub fn representation(count: u64, pages_explored: u64) -> f64 {
    if pages_explored == 0 {
        return 0.0;
    }
    100.0 * count as f64 / pages_explored as f64
}

/// Computes the novelty weight of a profiled candidate
///
/// In a live crawl the gate counts every candidate as explored before it is
/// scored, and only processed pages are observed, so every rarity count stays
/// strictly below `pages_explored`. Each axis then contributes, and the
/// `ln(content_len)` fallback is only reachable when calling this directly
/// with counts that have caught up with `pages_explored`.
///
/// # Examples
///
/// ```
/// use kaleido_crawl::crawler::novelty_weight;
/// use kaleido_crawl::state::{PageProfile, RarityStats};
///
/// let profile = PageProfile {
///     language: "eng".to_string(),
///     country: "FR".to_string(),
///     domain: "example.com".to_string(),
/// };
/// let weight = novelty_weight(&profile, &RarityStats::new(), 0, 1000);
/// assert_eq!(weight, 10.0 * 100.0 + 5.0 * 100.0 + 2.5 * 100.0);
/// ```
pub fn novelty_weight(
    profile: &PageProfile,
    rarity: &RarityStats,
    pages_explored: u64,
    content_len: usize,
) -> f64 {
    let axes = [
        (rarity.country_count(&profile.country), COUNTRY_FACTOR),
        (rarity.language_count(&profile.language), LANGUAGE_FACTOR),
        (rarity.domain_count(&profile.domain), DOMAIN_FACTOR),
    ];

    let weight: f64 = axes
        .iter()
        .map(|&(count, factor)| {
            let rep = representation(count, pages_explored);
            if rep < 100.0 {
                factor * (100.0 - rep)
            } else {
                0.0
            }
        })
        .sum();

    if weight == 0.0 {
        size_weight(content_len)
    } else {
        weight
    }
}

// ln(0) is -inf; an empty body is simply worth nothing
fn size_weight(content_len: usize) -> f64 {
    if content_len == 0 {
        0.0
    } else {
        (content_len as f64).ln()
    }
}

/// Scores candidates by probing them
///
/// The probe is a full fetch of the candidate, separate from the fetch made if
/// it is later processed. Scoring reads the rarity counters but never updates
/// them.
#[derive(Debug, Clone)]
pub struct NoveltyScorer {
    pipeline: FetchPipeline,
    profiler: Profiler,
}

impl NoveltyScorer {
    pub fn new(pipeline: FetchPipeline, profiler: Profiler) -> Self {
        Self { pipeline, profiler }
    }

    /// Probes and scores a URL
    ///
    /// Returns None when the probe fetch fails; the URL is blacklisted by then.
    pub async fn score(&self, url: &str, state: &mut CrawlState) -> Option<f64> {
        let page = self.pipeline.fetch(url, &mut state.tracker).await?;

        let html = String::from_utf8_lossy(&page.body);
        let title = parse_page(&html, &page.url).ok().map(|parsed| parsed.title);

        let profile = self.profiler.profile(url, title.as_deref()).await;
        let weight = novelty_weight(
            &profile,
            &state.rarity,
            state.stats.pages_explored,
            page.body.len(),
        );

        tracing::debug!(
            "Scored {} at {:.3} (language {}, country {}, domain {})",
            url,
            weight,
            profile.language,
            profile.country,
            profile.domain
        );

        Some(weight)
    }
}
