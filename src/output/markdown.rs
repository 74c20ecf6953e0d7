//! Markdown summary generation
//!
//! Writes the crawl report as a human-readable markdown file: run
//! information, the discovered (title, url) pairs, and the errors seen.

use crate::output::report::{CrawlReport, OutputResult};
use crate::output::stats::display_title;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary of a crawl
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Ripple-Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed_url));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));
    md.push_str(&format!("- **Stopped**: {}\n", report.stop_reason));
    md.push_str(&format!("- **Final Depth Bound**: {}\n\n", report.final_depth));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages**: {}\n", report.success_count()));
    md.push_str(&format!("- **Errors**: {}\n", report.error_count()));
    md.push_str(&format!("- **Addresses Visited**: {}\n", report.visited));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    md.push_str("## Pages\n\n");
    if report.pages.is_empty() {
        md.push_str("_No pages were fetched._\n\n");
    } else {
        md.push_str("| Title | URL |\n");
        md.push_str("|-------|-----|\n");
        for page in &report.pages {
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(display_title(&page.title)),
                escape_cell(&page.url)
            ));
        }
        md.push('\n');
    }

    if !report.errors.is_empty() {
        md.push_str("## Errors\n\n");
        for error in &report.errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    md
}

/// Escapes characters that would break a markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
