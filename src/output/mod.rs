//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - Dumping the end-of-run statistics through the log sink
//! - Writing the optional markdown report

mod markdown;
mod summary;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use summary::{log_summary, CrawlSummary, OutputError, OutputResult};

/// Width of the visual section delimiter in the log
pub const SECTION_BREAK_WIDTH: usize = 100;

/// Logs a visual section delimiter
pub fn section_break() {
    tracing::info!("{}", "=".repeat(SECTION_BREAK_WIDTH));
}
