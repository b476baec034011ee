//! HTTP fetcher implementation
//!
//! This module handles all raw HTTP requests for the crawler:
//! - Building HTTP clients with a proper user agent string
//! - GET requests for page content (3 s timeout)
//! - HEAD probes for existence and Content-Type (1 s timeout)
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Timeout for page fetches
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for existence probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Failure of a single HTTP request
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout, connection failure or body read failure
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    /// Response status >= 400
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Returns true for HTTP 429 responses
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS.as_u16())
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Result of a HEAD probe
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub status_code: u16,
    /// Media type without parameters, lowercased
    pub media_type: Option<String>,
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are set per request, so the client itself has none.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a GET request and reads the full body
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let response = check_status(url, response)?;
    let status_code = response.status().as_u16();
    let content_type = header_value(&response);

    let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    Ok(FetchedPage {
        url: url.to_string(),
        status_code,
        content_type,
        body: body.to_vec(),
    })
}

/// Sends a HEAD request to learn whether a URL exists and what it serves
pub async fn probe_url(client: &Client, url: &str) -> Result<ProbeResult, FetchError> {
    let response = client
        .head(url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let response = check_status(url, response)?;

    Ok(ProbeResult {
        status_code: response.status().as_u16(),
        media_type: header_value(&response).map(|v| media_type(&v)),
    })
}

fn check_status(url: &str, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn header_value(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Strips parameters from a Content-Type value
///
/// `"text/html; charset=utf-8"` becomes `"text/html"`.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
