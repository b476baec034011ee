//! Page profiling: language, hosting country and registrable domain
//!
//! Language comes from the page title via `whatlang`. Country comes from a DNS
//! lookup of the host followed by a call to an ipinfo-compatible service.
//! Anything that cannot be determined is recorded as [`UNKNOWN`].

use crate::config::GeoConfig;
use crate::state::{PageProfile, UNKNOWN};
use crate::url::{extract_host, registrable_domain};
use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Timeout for a geolocation request
const GEO_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        source: std::io::Error,
    },

    #[error("No address found for {0}")]
    NoAddress(String),

    #[error("Geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geolocation response has no country for {0}")]
    MissingCountry(IpAddr),
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    country: Option<String>,
}

/// Detects the language of `text`, returning an ISO 639-3 code or [`UNKNOWN`]
///
/// # Examples
///
/// ```
/// use kaleido_crawl::crawler::detect_language;
///
/// assert_eq!(detect_language("The quick brown fox jumps over the lazy dog"), "eng");
/// assert_eq!(detect_language(""), "NA");
/// ```
pub fn detect_language(text: &str) -> String {
    whatlang::detect(text)
        .map(|info| info.lang().code().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Builds [`PageProfile`]s for candidate and sampled pages
#[derive(Debug, Clone)]
pub struct Profiler {
    client: Client,
    geo: GeoConfig,
}

impl Profiler {
    pub fn new(client: Client, geo: GeoConfig) -> Self {
        Self { client, geo }
    }

    /// Profiles a page from its URL and title
    ///
    /// A missing title gives an unknown language.
    pub async fn profile(&self, url: &str, title: Option<&str>) -> PageProfile {
        let language = title
            .map(detect_language)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let country = match extract_host(url) {
            Ok(host) => self.country_or_unknown(&host).await,
            Err(_) => UNKNOWN.to_string(),
        };

        let domain = registrable_domain(url).unwrap_or_else(|_| url.to_string());

        PageProfile {
            language,
            country,
            domain,
        }
    }

    async fn country_or_unknown(&self, host: &str) -> String {
        if !self.geo.enabled {
            return UNKNOWN.to_string();
        }

        match self.country_of(host).await {
            Ok(country) => country,
            Err(e) => {
                tracing::debug!("Country lookup failed for {}: {}", host, e);
                UNKNOWN.to_string()
            }
        }
    }

    /// Resolves `host` and asks the geolocation service for its country code
    pub async fn country_of(&self, host: &str) -> Result<String, GeoError> {
        let ip = resolve_host(host).await?;

        let endpoint = format!("{}/{}/json", self.geo.endpoint.trim_end_matches('/'), ip);
        let response: GeoResponse = self
            .client
            .get(&endpoint)
            .timeout(GEO_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .country
            .filter(|c| !c.trim().is_empty())
            .ok_or(GeoError::MissingCountry(ip))
    }
}

/// Resolves a host name to its first address
pub async fn resolve_host(host: &str) -> Result<IpAddr, GeoError> {
    let mut addrs = tokio::net::lookup_host((host, 80))
        .await
        .map_err(|source| GeoError::Resolve {
            host: host.to_string(),
            source,
        })?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| GeoError::NoAddress(host.to_string()))
}
