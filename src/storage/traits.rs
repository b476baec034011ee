//! Storage traits and error types
//!
//! This module defines the trait interface for page stores and the
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// A download folder could not be created; the run cannot continue
    #[error("Failed to create download folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    /// Returns true if the error must abort the crawl
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CreateFolder { .. })
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page store implementations
///
/// A store persists the raw bytes of sampled pages.
pub trait PageStore {
    /// Saves a page and returns where it was written
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the bytes were fetched from
    /// * `content` - Raw response body, written verbatim
    /// * `title` - Page title, used to derive the file name
    fn save(&mut self, url: &str, content: &[u8], title: &str) -> StorageResult<PathBuf>;

    /// Number of pages saved so far
    fn saved_count(&self) -> u64;
}
