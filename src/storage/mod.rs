//! Storage module for persisting sampled pages
//!
//! This module handles writing downloaded pages to disk:
//! - Rotating numbered subfolders under a download root
//! - File naming derived from page titles
//! - Fatal handling of folder-creation failures

mod download;
mod traits;

pub use download::{DownloadCursor, DownloadStore};
pub use traits::{PageStore, StorageError, StorageResult};
