//! HTML parser for extracting the title and outbound links
//!
//! The title names the saved file and feeds language detection; the links are
//! the candidate children of the page.

use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Failure to turn a fetched document into a usable page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBase { url: String, reason: String },

    #[error("Document at {url} has no title")]
    MissingTitle { url: String },
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the first <title> tag)
    pub title: String,

    /// All followable links found on the page (absolute URLs, document order)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the title and links
///
/// # Link Extraction Rules
///
/// Only `<a href="...">` targets are considered. These are discarded:
/// - `href="/"` (link back to the site root)
/// - fragment-only links
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - anything that does not resolve to an http(s) URL
///
/// Relative links are resolved against `base_url` with standard URL joining.
///
/// # Example
///
/// ```
/// use kaleido_crawl::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html, "https://example.com/dir/").unwrap();
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page"]);
/// ```
pub fn parse_page(html: &str, base_url: &str) -> Result<ParsedPage, ParseError> {
    let base = Url::parse(base_url).map_err(|e| ParseError::InvalidBase {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(html);

    let title = extract_title(&document).ok_or_else(|| ParseError::MissingTitle {
        url: base_url.to_string(),
    })?;

    let links = extract_links(&document, &base);

    Ok(ParsedPage { title, links })
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all followable anchor targets from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href == "/" {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/dir/page";

    fn base_url() -> Url {
        Url::parse(BASE).unwrap()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        let parsed = parse_page(html, BASE).unwrap();
        assert_eq!(parsed.title, "Test Page");
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        let parsed = parse_page(html, BASE).unwrap();
        assert_eq!(parsed.title, "Test Page");
    }

    #[test]
    fn test_missing_title_is_parse_error() {
        let html = r#"<html><head></head><body><a href="/x">x</a></body></html>"#;
        let result = parse_page(html, BASE);
        assert!(matches!(result, Err(ParseError::MissingTitle { .. })));
    }

    #[test]
    fn test_blank_title_is_parse_error() {
        let html = r#"<html><head><title>   </title></head></html>"#;
        assert!(parse_page(html, BASE).is_err());
    }

    #[test]
    fn test_invalid_base() {
        let html = r#"<html><head><title>T</title></head></html>"#;
        let result = parse_page(html, "not a url");
        assert!(matches!(result, Err(ParseError::InvalidBase { .. })));
    }

    #[test]
    fn test_malformed_html_still_parses() {
        let html = r#"<title>Broken<a href="https://other.com/x">x"#;
        let parsed = parse_page(html, BASE).unwrap();
        assert!(parsed.title.starts_with("Broken"));
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><head><title>T</title></head><body><a href="https://other.com/page">Link</a></body></html>"#;
        let parsed = parse_page(html, BASE).unwrap();
        assert_eq!(parsed.links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            resolve_link("/other", &base_url()),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_path_relative_links() {
        assert_eq!(
            resolve_link("other", &base_url()),
            Some("https://example.com/dir/other".to_string())
        );
        assert_eq!(
            resolve_link("../up", &base_url()),
            Some("https://example.com/up".to_string())
        );
    }

    #[test]
    fn test_skip_self_root_link() {
        assert_eq!(resolve_link("/", &base_url()), None);
    }

    #[test]
    fn test_skip_special_schemes() {
        for href in [
            "javascript:void(0)",
            "mailto:test@example.com",
            "tel:+1234567890",
            "data:text/html,<h1>Test</h1>",
            "ftp://example.com/file",
        ] {
            assert_eq!(resolve_link(href, &base_url()), None, "{}", href);
        }
    }

    #[test]
    fn test_skip_fragment_only() {
        assert_eq!(resolve_link("#section", &base_url()), None);
    }

    #[test]
    fn test_links_keep_document_order() {
        let html = r#"
            <html><head><title>T</title></head>
            <body>
                <a href="/page1">Link 1</a>
                <a href="/">Home</a>
                <a>No href</a>
                <a href="/page2">Link 2</a>
                <a href="https://other.com/page3">Link 3</a>
            </body>
            </html>
        "#;
        let parsed = parse_page(html, BASE).unwrap();
        assert_eq!(
            parsed.links,
            vec![
                "https://example.com/page1",
                "https://example.com/page2",
                "https://other.com/page3"
            ]
        );
    }
}
