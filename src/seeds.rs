//! Seed source
//!
//! Produces the ordered list of URLs the crawl starts from.

use crate::config::{SeedConfig, SeedStrategy};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading seeds
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Loads seeds according to the configured strategy
pub fn load_seeds(config: &SeedConfig) -> Result<Vec<String>, SeedError> {
    match config.strategy {
        SeedStrategy::ReadFromFile => read_seed_file(Path::new(&config.file_path)),
        SeedStrategy::FromSearchEngine => Ok(seeds_from_search_engine()),
    }
}

/// Reads one seed URL per line, trimming whitespace and skipping blank lines
pub fn read_seed_file(path: &Path) -> Result<Vec<String>, SeedError> {
    let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Search-engine seeding has no backing service and yields nothing
fn seeds_from_search_engine() -> Vec<String> {
    tracing::warn!("Seeding from a search engine is not available; no seeds loaded");
    Vec::new()
}
