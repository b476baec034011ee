//! Governed fetch and parse pipeline
//!
//! Wraps the raw fetcher with the blacklist: a URL that fails to fetch is
//! excluded for the rest of the run. Parsing samples a bounded set of children.

use crate::crawler::fetcher::{fetch_url, FetchedPage};
use crate::crawler::parser::{parse_page, ParseError, ParsedPage};
use crate::state::VisitTracker;
use rand::Rng;
use reqwest::Client;

/// Fetches and parses pages on behalf of the scorer and the coordinator
#[derive(Debug, Clone)]
pub struct FetchPipeline {
    client: Client,
    max_children: usize,
}

impl FetchPipeline {
    pub fn new(client: Client, max_children: usize) -> Self {
        Self {
            client,
            max_children,
        }
    }

    /// Fetches a page, blacklisting the URL on any failure
    ///
    /// Returns None without a request when the URL is already blacklisted.
    pub async fn fetch(&self, url: &str, tracker: &mut VisitTracker) -> Option<FetchedPage> {
        if tracker.is_blacklisted(url) {
            return None;
        }

        match fetch_url(&self.client, url).await {
            Ok(page) => Some(page),
            Err(e) => {
                if e.is_rate_limited() {
                    tracing::warn!("Rate limited by {}, blacklisting", url);
                } else {
                    tracing::debug!("Fetch failed, blacklisting: {}", e);
                }
                tracker.blacklist(url);
                None
            }
        }
    }

    /// Parses a fetched page and samples its children
    pub fn parse(&self, page: &FetchedPage) -> Result<ParsedPage, ParseError> {
        let html = String::from_utf8_lossy(&page.body);
        let mut parsed = parse_page(&html, &page.url)?;
        parsed.links = sample_links(parsed.links, self.max_children, &mut rand::thread_rng());
        Ok(parsed)
    }
}

/// Picks at most `max` links uniformly at random, without replacement
///
/// When there are `max` links or fewer, all of them are kept in order.
pub fn sample_links<R: Rng + ?Sized>(links: Vec<String>, max: usize, rng: &mut R) -> Vec<String> {
    if links.len() <= max {
        return links;
    }

    let mut picked: Vec<usize> = rand::seq::index::sample(rng, links.len(), max).into_vec();
    picked.sort_unstable();

    let mut links: Vec<Option<String>> = links.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| links[i].take())
        .collect()
}
