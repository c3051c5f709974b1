//! Crawl statistics
//!
//! Counters are updated by units of work as they run and frozen into a
//! `CrawlReport` once the crawl has drained.

use crate::crawler::RejectReason;
use crate::state::VisitLedger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use url::Url;

/// Live counters shared by every unit of work
#[derive(Debug, Default)]
pub struct CrawlStats {
    visited: Mutex<Vec<String>>,
    fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    invalid_links: AtomicUsize,
    off_host: AtomicUsize,
    robots_denied: AtomicUsize,
    already_claimed: AtomicUsize,
    over_budget: AtomicUsize,
}

impl CrawlStats {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a unit is about to fetch `url`
    pub fn record_visit(&self, url: &Url) {
        let mut visited = self.visited.lock().unwrap_or_else(PoisonError::into_inner);
        visited.push(url.to_string());
    }

    /// Records a page body received successfully
    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a page fetch that ended the unit early
    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records why a discovered link was dropped
    pub fn record_rejection(&self, reason: &RejectReason) {
        let counter = match reason {
            RejectReason::Invalid(_) => &self.invalid_links,
            RejectReason::OffHost => &self.off_host,
            RejectReason::RobotsDenied => &self.robots_denied,
            RejectReason::AlreadyClaimed => &self.already_claimed,
            RejectReason::BudgetExhausted => &self.over_budget,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Freezes the counters into a report
    pub fn report(&self, ledger: &VisitLedger, elapsed: Duration) -> CrawlReport {
        let mut visited = self
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        visited.sort();

        CrawlReport {
            pages_crawled: ledger.claimed_count(),
            visited,
            fetched: self.fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            rejected: RejectCounts {
                invalid_links: self.invalid_links.load(Ordering::Relaxed),
                off_host: self.off_host.load(Ordering::Relaxed),
                robots_denied: self.robots_denied.load(Ordering::Relaxed),
                already_claimed: self.already_claimed.load(Ordering::Relaxed),
                over_budget: self.over_budget.load(Ordering::Relaxed),
            },
            elapsed,
        }
    }
}

/// Dropped links by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectCounts {
    pub invalid_links: usize,
    pub off_host: usize,
    pub robots_denied: usize,
    pub already_claimed: usize,
    pub over_budget: usize,
}

impl RejectCounts {
    /// Total dropped links
    pub fn total(&self) -> usize {
        self.invalid_links
            + self.off_host
            + self.robots_denied
            + self.already_claimed
            + self.over_budget
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// URLs claimed in the ledger, seed included
    ///
    /// This counts claims, not fetches. A seed denied by robots.txt is
    /// claimed but never visited, so it is counted here and absent from
    /// `visited`.
    pub pages_crawled: usize,

    /// URLs a fetch was issued for, sorted
    pub visited: Vec<String>,

    /// Fetches that returned a body
    pub fetched: usize,

    /// Fetches that failed (network, timeout, non-success status)
    pub fetch_failures: usize,

    /// Dropped links by reason
    pub rejected: RejectCounts,

    /// Wall-clock time from start to drain
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of pages a fetch was issued for
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }
}

/// Prints the end-of-crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    println!();
    println!("Crawling took {:.2?}", report.elapsed);
    println!("Total pages crawled: {}", report.pages_visited());
    println!(
        "Fetched: {}, failed: {}",
        report.fetched, report.fetch_failures
    );
    println!(
        "Links dropped: {} (invalid {}, off-host {}, robots {}, duplicate {}, over budget {})",
        report.rejected.total(),
        report.rejected.invalid_links,
        report.rejected.off_host,
        report.rejected.robots_denied,
        report.rejected.already_claimed,
        report.rejected.over_budget
    );
}
