//! Output module: how results leave the crawler
//!
//! This module handles:
//! - The result stream between crawl tasks and their single consumer
//! - The termination policy that drains it and decides when to stop
//! - Reporting the finished crawl to the console and as markdown

mod markdown;
pub mod policy;
mod report;
pub mod stats;
pub mod stream;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use policy::{DrainSummary, StopReason, TerminationPolicy};
pub use report::{CrawlReport, CrawledPage, OutputError, OutputResult};
pub use stats::{format_statistics, print_statistics};
pub use stream::{result_channel, CrawlOutcome, ResultSender, ResultStream};
