//! URL handling module for Kaleido
//!
//! URLs are treated as opaque strings: they are compared verbatim and are never
//! normalized. This module derives the two keys the crawler groups URLs by, the
//! dedup [`Signature`] and the registrable domain.

mod domain;

pub use domain::{extract_host, registrable_domain};

/// Dedup key of a URL string
pub type Signature = u64;

/// Computes the signature of a URL
///
/// The hash is xxh3 over the raw bytes, so it is stable across processes.
/// Collisions between distinct URLs are tolerated, not detected.
///
/// # Examples
///
/// ```
/// use kaleido_crawl::url::signature;
///
/// assert_eq!(signature("https://example.com/"), signature("https://example.com/"));
/// assert_ne!(signature("https://example.com/"), signature("https://example.com"));
/// ```
pub fn signature(url: &str) -> Signature {
    xxhash_rust::xxh3::xxh3_64(url.as_bytes())
}
