//! Robots.txt handling module
//!
//! The policy is fetched fresh on every check; nothing is cached between calls.
//! Any failure to obtain a usable policy denies the fetch.

mod parser;

pub use parser::{ParsedRobots, GENERIC_AGENT};

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Timeout for a robots.txt request
const ROBOTS_TIMEOUT: Duration = Duration::from_secs(3);

/// Reasons a robots.txt policy could not be obtained
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("Cannot derive robots.txt location from {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Server error {status} for {url}")]
    ServerError { url: String, status: u16 },
}

/// Builds the robots.txt URL for the origin of `url`
///
/// # Examples
///
/// ```
/// use kaleido_crawl::robots::robots_url;
///
/// assert_eq!(
///     robots_url("https://example.com/a/b?c").unwrap(),
///     "https://example.com/robots.txt"
/// );
/// ```
pub fn robots_url(url: &str) -> Result<String, RobotsError> {
    let parsed = Url::parse(url).map_err(|_| RobotsError::InvalidUrl(url.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(RobotsError::InvalidUrl(url.to_string()));
    }
    Ok(format!("{}/robots.txt", parsed.origin().ascii_serialization()))
}

/// Fetches and parses robots.txt
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | parse the body |
/// | 401, 403 | disallow everything |
/// | other 4xx | allow everything |
/// | 5xx, network error | error (callers deny) |
pub async fn fetch_robots(client: &Client, robots_url: &str) -> Result<ParsedRobots, RobotsError> {
    let response = client
        .get(robots_url)
        .timeout(ROBOTS_TIMEOUT)
        .send()
        .await
        .map_err(|source| RobotsError::Fetch {
            url: robots_url.to_string(),
            source,
        })?;

    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Ok(ParsedRobots::disallow_all());
    }

    if status.is_client_error() {
        return Ok(ParsedRobots::allow_all());
    }

    if !status.is_success() {
        return Err(RobotsError::ServerError {
            url: robots_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| RobotsError::Fetch {
        url: robots_url.to_string(),
        source,
    })?;

    Ok(ParsedRobots::from_content(&body))
}

/// Decides whether the generic user agent may fetch `url`
///
/// Fails closed: any error obtaining the policy yields `false`.
pub async fn allowed(client: &Client, robots_url: &str, url: &str) -> bool {
    match fetch_robots(client, robots_url).await {
        Ok(robots) => robots.allows(url),
        Err(e) => {
            tracing::debug!("Robots policy unavailable, denying {}: {}", url, e);
            false
        }
    }
}
