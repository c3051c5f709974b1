//! Visit ledger: the crawl's single claim point
//!
//! Every URL that gets fetched is claimed here first. The ledger grants at most
//! one claim per canonical URL and stops granting once the page budget is
//! spent. It only ever grows.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Result of attempting to claim a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimOutcome {
    /// The caller now owns the URL and must visit it
    Claimed,
    /// Another unit of work already owns the URL
    AlreadyClaimed,
    /// The page budget is spent
    BudgetExhausted,
}

impl ClaimOutcome {
    /// Returns true if the claim was granted
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// Thread-safe set of claimed URLs bounded by a page budget
#[derive(Debug)]
pub struct VisitLedger {
    max_pages: usize,
    claimed: Mutex<HashSet<String>>,
}

impl VisitLedger {
    /// Creates an empty ledger that grants at most `max_pages` claims
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Pre-claims the start URL
    ///
    /// The seed counts toward the budget like any other claim.
    pub fn seed(&self, url: &Url) -> ClaimOutcome {
        self.claim(url)
    }

    /// Atomically claims `url`
    ///
    /// A URL that is already claimed reports `AlreadyClaimed` even when the
    /// budget is also spent. Refused claims leave the ledger untouched.
    pub fn claim(&self, url: &Url) -> ClaimOutcome {
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);

        if claimed.contains(url.as_str()) {
            return ClaimOutcome::AlreadyClaimed;
        }

        if claimed.len() >= self.max_pages {
            return ClaimOutcome::BudgetExhausted;
        }

        claimed.insert(url.as_str().to_string());
        ClaimOutcome::Claimed
    }

    /// Boolean form of [`claim`](Self::claim)
    pub fn try_claim(&self, url: &Url) -> bool {
        self.claim(url).is_claimed()
    }

    /// Returns true if `url` has been claimed
    pub fn is_claimed(&self, url: &Url) -> bool {
        let claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        claimed.contains(url.as_str())
    }

    /// Number of claims granted so far
    pub fn claimed_count(&self) -> usize {
        let claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        claimed.len()
    }
}
