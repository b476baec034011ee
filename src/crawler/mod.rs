//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HEAD probes
//! - HTML parsing, link extraction and child sampling
//! - The politeness gate every candidate must pass
//! - Novelty scoring and the per-seed frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod gate;
mod parser;
mod pipeline;
mod profile;
mod scorer;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, fetch_url, media_type, probe_url, FetchError, FetchedPage, ProbeResult,
};
pub use frontier::{Frontier, FrontierEntry};
pub use gate::{check_shape, PolitenessGate, Rejection, MAX_URL_LENGTH};
pub use parser::{parse_page, resolve_link, ParseError, ParsedPage};
pub use pipeline::{sample_links, FetchPipeline};
pub use profile::{detect_language, GeoError, Profiler};
pub use scorer::{novelty_weight, NoveltyScorer};
