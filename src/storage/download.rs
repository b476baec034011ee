//! Rotating-folder page store
//!
//! Pages are written under `<root>/<index>/`, starting at index 0. A new folder
//! is allocated whenever the current one holds `max_files_per_folder` files.

use crate::storage::traits::{PageStore, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Characters that may not appear in a file name on common filesystems
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Longest file name, in bytes, accepted by common filesystems
const MAX_FILENAME_BYTES: usize = 255;

/// Position of the store inside its folder rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadCursor {
    /// Index of the current folder, `None` until the first save
    pub folder_index: Option<u64>,

    /// Files written to the current folder
    pub files_in_folder: usize,
}

/// Writes sampled pages to numbered subfolders of a root directory
#[derive(Debug)]
pub struct DownloadStore {
    root: PathBuf,
    max_files_per_folder: usize,
    cursor: DownloadCursor,
    saved: u64,
}

impl DownloadStore {
    /// Creates a store; no directory is touched until the first save
    pub fn new(root: impl Into<PathBuf>, max_files_per_folder: usize) -> Self {
        Self {
            root: root.into(),
            max_files_per_folder: max_files_per_folder.max(1),
            cursor: DownloadCursor::default(),
            saved: 0,
        }
    }

    pub fn cursor(&self) -> DownloadCursor {
        self.cursor
    }

    /// Returns the folder for the next file, rotating when needed
    fn current_folder(&mut self) -> StorageResult<PathBuf> {
        let rotate = match self.cursor.folder_index {
            None => true,
            Some(_) => self.cursor.files_in_folder >= self.max_files_per_folder,
        };

        if rotate {
            let next = self.cursor.folder_index.map_or(0, |i| i + 1);
            let path = self.root.join(next.to_string());
            std::fs::create_dir_all(&path).map_err(|source| StorageError::CreateFolder {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Allocated download folder {}", path.display());
            self.cursor = DownloadCursor {
                folder_index: Some(next),
                files_in_folder: 0,
            };
            return Ok(path);
        }

        let index = self.cursor.folder_index.unwrap_or(0);
        Ok(self.root.join(index.to_string()))
    }

    /// File name for a page: the title with all whitespace removed, or a
    /// synthetic `file-<n>.html` when that is empty, not filesystem-safe, too
    /// long, or already taken in `folder`
    fn file_name(&self, folder: &Path, title: &str) -> String {
        let stripped: String = title.chars().filter(|c| !c.is_whitespace()).collect();

        if stripped.is_empty()
            || stripped.len() > MAX_FILENAME_BYTES
            || folder.join(&stripped).exists()
            || stripped.contains(ILLEGAL_FILENAME_CHARS)
            || stripped.chars().any(char::is_control)
            || stripped == "."
            || stripped == ".."
        {
            return format!("file-{}.html", self.saved + 1);
        }

        stripped
    }
}

impl PageStore for DownloadStore {
    fn save(&mut self, url: &str, content: &[u8], title: &str) -> StorageResult<PathBuf> {
        let folder = self.current_folder()?;
        let path = folder.join(self.file_name(&folder, title));

        std::fs::write(&path, content).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        self.cursor.files_in_folder += 1;
        self.saved += 1;

        tracing::info!("URL Sampled: {}, Size: {}", url, content.len());

        Ok(path)
    }

    fn saved_count(&self) -> u64 {
        self.saved
    }
}
