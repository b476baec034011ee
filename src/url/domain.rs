use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lowercase host of a URL string
///
/// # Examples
///
/// ```
/// use kaleido_crawl::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.com/path").unwrap(), "example.com");
/// assert!(extract_host("not a url").is_err());
/// ```
pub fn extract_host(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))
}

/// Derives the registrable domain key of a URL
///
/// This is a simplified eTLD+1: the last two dot-separated labels of the host.
/// Hosts with a single label are returned whole.
///
/// # Examples
///
/// ```
/// use kaleido_crawl::url::registrable_domain;
///
/// assert_eq!(registrable_domain("https://blog.example.com/post").unwrap(), "example.com");
/// assert_eq!(registrable_domain("http://localhost:8080/").unwrap(), "localhost");
/// ```
pub fn registrable_domain(url: &str) -> UrlResult<String> {
    let host = extract_host(url)?;
    Ok(last_two_labels(&host))
}

fn last_two_labels(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return host.to_string();
    }
    labels[labels.len() - 2..].join(".")
}
