//! Kaleido: a politeness-aware, diversity-maximizing web crawler
//!
//! This crate samples the web starting from a list of seeds. Candidate links are
//! scored by how much linguistic, geographic and domain novelty they bring, and
//! every fetch is gated by robots.txt, content type, blacklist and per-domain caps.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod seeds;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Kaleido operations
#[derive(Debug, Error)]
pub enum KaleidoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed error: {0}")]
    Seed(#[from] seeds::SeedError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTML parse error: {0}")]
    Parse(#[from] crawler::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Kaleido operations
pub type Result<T> = std::result::Result<T, KaleidoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::CrawlState;
pub use crate::url::{registrable_domain, signature, Signature};
