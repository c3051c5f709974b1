//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Transport` seam
//! - HTML link extraction
//! - The per-link normalize/filter/gate/claim pipeline
//! - Bounded-concurrency scheduling and overall crawl coordination

mod coordinator;
mod dispatch;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{CrawlSettings, Crawler, VisitCallback};
pub use dispatch::{screen_link, LinkOutcome, LinkPipeline, RejectReason};
pub use fetcher::{build_http_client, HttpTransport, Transport};
pub use parser::{extract_links, Links};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl over HTTP. It resolves
/// the settings, builds the HTTP client, and runs until every claimed page has
/// been processed.
///
/// # Arguments
///
/// * `config` - The crawler configuration (seed URL and page budget required)
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - The configuration or seed was unusable
pub async fn crawl(config: &Config) -> Result<CrawlReport, CrawlError> {
    Ok(Crawler::from_config(config)?.run().await)
}
