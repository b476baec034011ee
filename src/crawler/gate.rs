//! Politeness and filter gate
//!
//! Decides whether a candidate URL may be fetched at all. Checks run in a fixed
//! order and stop at the first failure: the local checks (blacklist, shape,
//! sensitive host, domain cap) come before the two network checks (HEAD probe
//! and robots policy), so a cheap rejection never costs a request.

use crate::config::Config;
use crate::crawler::fetcher::probe_url;
use crate::robots::{allowed, robots_url};
use crate::state::{CrawlState, RarityStats};
use crate::url::{extract_host, registrable_domain};
use reqwest::Client;
use std::collections::HashSet;
use thiserror::Error;

/// Longest URL the gate accepts
pub const MAX_URL_LENGTH: usize = 100;

/// Characters that mark query strings, fragments, escapes and credentials
pub const FORBIDDEN_CHARS: [char; 4] = ['?', '#', '%', '@'];

/// Why the gate refused a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("URL is blacklisted")]
    Blacklisted,

    #[error("URL is {0} characters long")]
    TooLong(usize),

    #[error("URL contains '{0}'")]
    ForbiddenCharacter(char),

    #[error("Host {0} is in a sensitive domain")]
    Sensitive(String),

    #[error("Domain {0} reached its page cap")]
    DomainCapReached(String),

    #[error("URL is malformed: {0}")]
    Malformed(String),

    #[error("Existence probe failed: {0}")]
    ProbeFailed(String),

    #[error("Unsupported content type {0:?}")]
    UnsupportedContentType(Option<String>),

    #[error("Disallowed by robots.txt")]
    RobotsDenied,
}

/// Gate evaluating candidates against the configured filters
#[derive(Debug, Clone)]
pub struct PolitenessGate {
    client: Client,
    supported_types: HashSet<String>,
    sensitive_labels: HashSet<String>,
    max_pages_per_domain: u64,
    log_explored: bool,
}

impl PolitenessGate {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            supported_types: config
                .filter
                .supported_content_types
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            sensitive_labels: config
                .filter
                .sensitive_suffixes
                .iter()
                .map(|s| s.trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            max_pages_per_domain: config.crawler.max_pages_per_domain,
            log_explored: config.logging.log_all_explored,
        }
    }

    /// Evaluates every check in order
    ///
    /// Counts the URL as explored whatever the verdict. A HEAD probe answered
    /// with 429 also blacklists the URL.
    pub async fn evaluate(&self, url: &str, state: &mut CrawlState) -> Result<(), Rejection> {
        state.stats.pages_explored += 1;
        if self.log_explored {
            tracing::info!(target: "kaleido_crawl::explored", "explored: {}", url);
        }

        if state.tracker.is_blacklisted(url) {
            return Err(Rejection::Blacklisted);
        }

        check_shape(url)?;

        let host = extract_host(url).map_err(|e| Rejection::Malformed(e.to_string()))?;
        if is_sensitive(&host, &self.sensitive_labels) {
            return Err(Rejection::Sensitive(host));
        }

        let domain = registrable_domain(url).map_err(|e| Rejection::Malformed(e.to_string()))?;
        if domain_cap_reached(&state.rarity, &domain, self.max_pages_per_domain) {
            return Err(Rejection::DomainCapReached(domain));
        }

        let probe = match probe_url(&self.client, url).await {
            Ok(probe) => probe,
            Err(e) => {
                if e.is_rate_limited() {
                    tracing::warn!("Rate limited by {} during probe, blacklisting", url);
                    state.tracker.blacklist(url);
                }
                return Err(Rejection::ProbeFailed(e.to_string()));
            }
        };

        match probe.media_type {
            Some(ref media) if self.supported_types.contains(media) => {}
            other => return Err(Rejection::UnsupportedContentType(other)),
        }

        let robots = robots_url(url).map_err(|e| Rejection::Malformed(e.to_string()))?;
        if !allowed(&self.client, &robots, url).await {
            return Err(Rejection::RobotsDenied);
        }

        Ok(())
    }

    /// Boolean form of [`evaluate`](Self::evaluate), logging the reason for a rejection
    pub async fn may_crawl(&self, url: &str, state: &mut CrawlState) -> bool {
        match self.evaluate(url, state).await {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!("Gate rejected {}: {}", url, reason);
                false
            }
        }
    }
}

/// Syntactic checks: length and forbidden characters
pub fn check_shape(url: &str) -> Result<(), Rejection> {
    let len = url.chars().count();
    if len > MAX_URL_LENGTH {
        return Err(Rejection::TooLong(len));
    }

    if let Some(c) = url.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(Rejection::ForbiddenCharacter(c));
    }

    Ok(())
}

/// Returns true if any dot-separated label of `host` is a sensitive label
pub fn is_sensitive(host: &str, sensitive_labels: &HashSet<String>) -> bool {
    host.split('.').any(|label| sensitive_labels.contains(label))
}

pub fn domain_cap_reached(rarity: &RarityStats, domain: &str, cap: u64) -> bool {
    rarity.domain_count(domain) >= cap
}
