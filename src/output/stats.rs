//! Console statistics for a finished crawl

use crate::output::report::CrawlReport;

/// Prints the crawl report to stdout in a formatted manner
pub fn print_statistics(report: &CrawlReport) {
    println!("{}", format_statistics(report));
}

/// Formats the crawl report as plain text
pub fn format_statistics(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Seed: {}\n", report.seed_url));
    out.push_str(&format!("  Stopped: {}\n", report.stop_reason));
    out.push_str(&format!(
        "  Duration: {:.2}s\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));
    out.push_str(&format!("  Final depth bound: {}\n", report.final_depth));
    out.push_str(&format!("  Addresses visited: {}\n", report.visited));
    out.push('\n');

    out.push_str(&format!("Pages ({}):\n", report.success_count()));
    for page in &report.pages {
        out.push_str(&format!("  - {} [{}]\n", page.url, display_title(&page.title)));
    }
    out.push('\n');

    if !report.errors.is_empty() {
        out.push_str(&format!("Errors ({}):\n", report.error_count()));
        for error in &report.errors {
            out.push_str(&format!("  - {}\n", error));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} pages, {} errors)",
        report.success_rate(),
        report.success_count(),
        report.error_count()
    ));

    out
}

pub(crate) fn display_title(title: &str) -> &str {
    if title.is_empty() {
        "untitled"
    } else {
        title
    }
}
