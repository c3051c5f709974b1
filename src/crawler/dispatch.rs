//! Per-link pipeline: normalize → host filter → robots gate → claim
//!
//! Each stage either passes the link on or rejects it with a reason, so drop
//! decisions can be counted, logged and asserted on instead of vanishing.

use crate::robots::RobotsGate;
use crate::state::{ClaimOutcome, VisitLedger};
use crate::url::{is_same_host, normalize_link};
use crate::LinkError;
use url::Url;

/// Why a discovered link was not scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The href could not be normalized
    Invalid(LinkError),
    /// The link points away from the crawl's host
    OffHost,
    /// robots.txt denies the link for our user agent
    RobotsDenied,
    /// Some unit already owns the link
    AlreadyClaimed,
    /// The page budget is spent
    BudgetExhausted,
}

/// Result of running one href through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was claimed; the caller must schedule it
    Accepted(Url),
    /// The link was dropped
    Rejected(RejectReason),
}

/// Normalizes `href` against `base` and applies the host filter
///
/// These are the pure stages of the pipeline; no shared state is touched.
pub fn screen_link(base: &str, href: &str, allowed_host: &str) -> Result<Url, RejectReason> {
    let url = normalize_link(base, href).map_err(RejectReason::Invalid)?;

    if !is_same_host(&url, allowed_host) {
        return Err(RejectReason::OffHost);
    }

    Ok(url)
}

/// Shared handles the pipeline gates links through
pub struct LinkPipeline<'a> {
    pub allowed_host: &'a str,
    pub user_agent: &'a str,
    pub robots: &'a RobotsGate,
    pub ledger: &'a VisitLedger,
}

impl LinkPipeline<'_> {
    /// Runs one href found on `base` through every stage
    ///
    /// The robots check precedes the claim, so a denied link never consumes
    /// budget.
    pub async fn evaluate(&self, base: &str, href: &str) -> LinkOutcome {
        let url = match screen_link(base, href, self.allowed_host) {
            Ok(url) => url,
            Err(reason) => return LinkOutcome::Rejected(reason),
        };

        if !self.robots.is_allowed(&url, self.user_agent).await {
            return LinkOutcome::Rejected(RejectReason::RobotsDenied);
        }

        match self.ledger.claim(&url) {
            ClaimOutcome::Claimed => LinkOutcome::Accepted(url),
            ClaimOutcome::AlreadyClaimed => LinkOutcome::Rejected(RejectReason::AlreadyClaimed),
            ClaimOutcome::BudgetExhausted => LinkOutcome::Rejected(RejectReason::BudgetExhausted),
        }
    }
}
