//! Markdown summary generation
//!
//! This module renders the crawl summary as a human-readable markdown report.

use crate::output::summary::{CrawlSummary, OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary to `output_path`
pub fn write_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let to_error = |source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    };

    let mut file = File::create(output_path).map_err(to_error)?;
    file.write_all(markdown.as_bytes()).map_err(to_error)?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Kaleido Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.0} seconds ({:.2} minutes)\n\n",
        summary.elapsed_secs,
        summary.elapsed_secs / 60.0
    ));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Explored**: {}\n", summary.pages_explored));
    md.push_str(&format!("- **Pages Sampled**: {}\n", summary.pages_sampled));
    md.push_str(&format!(
        "- **Sample Rate**: {:.2}%\n",
        summary.sample_rate()
    ));
    md.push_str(&format!("- **URLs Visited**: {}\n", summary.urls_visited));
    md.push_str(&format!(
        "- **URLs Blacklisted**: {}\n",
        summary.urls_blacklisted
    ));
    md.push_str(&format!(
        "- **Unique Domains**: {}\n\n",
        summary.unique_domains
    ));

    push_table(&mut md, "Languages", "Language", &summary.languages);
    push_table(&mut md, "Countries", "Country", &summary.countries);

    md
}

fn push_table(md: &mut String, heading: &str, column: &str, rows: &[(String, u64)]) {
    if rows.is_empty() {
        return;
    }

    md.push_str(&format!("## {}\n\n", heading));
    md.push_str(&format!("| {} | Pages |\n", column));
    md.push_str("|---|---|\n");
    for (value, count) in rows {
        md.push_str(&format!("| {} | {} |\n", value, count));
    }
    md.push('\n');
}
