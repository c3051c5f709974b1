//! Output module
//!
//! Crawl statistics and the end-of-run summary.

mod stats;

pub use stats::{print_report, CrawlReport, CrawlStats, RejectCounts};
