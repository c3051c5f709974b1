//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the crawl-wide shared state (visit ledger, robots
//! gate, scheduler) behind a single context handle and drives units of work:
//! - Seeding the ledger and scheduling the start URL
//! - Fetching a page under a permit and extracting its links
//! - Passing links through the per-link pipeline and spawning claimed ones
//! - Waiting for every spawned unit to finish

use crate::config::{validate, Config};
use crate::crawler::dispatch::{LinkOutcome, LinkPipeline, RejectReason};
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{HttpTransport, Transport};
use crate::output::{CrawlReport, CrawlStats};
use crate::robots::RobotsGate;
use crate::state::{ClaimOutcome, UnitState, VisitLedger};
use crate::url::{host_key, normalize_seed};
use crate::{ConfigError, CrawlError};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Callback invoked once per page, just before its fetch is issued
pub type VisitCallback = Arc<dyn Fn(&Url) + Send + Sync>;

/// Resolved, validated parameters for one crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Canonical start URL
    pub seed: Url,

    /// Host (with non-default port) every crawled URL must share
    pub allowed_host: String,

    /// Maximum number of claimed pages, seed included
    pub max_pages: usize,

    /// Maximum number of units fetching or parsing at once
    pub concurrency_limit: usize,

    /// Product token evaluated against robots.txt
    pub user_agent: String,
}

impl CrawlSettings {
    /// Builds settings from a seed and budget, with default limits
    pub fn new(seed: &str, max_pages: usize) -> Result<Self, CrawlError> {
        let config = Config {
            crawler: crate::config::CrawlerConfig {
                seed_url: Some(seed.to_string()),
                max_pages: Some(max_pages),
                ..Default::default()
            },
            ..Default::default()
        };
        Self::from_config(&config)
    }

    /// Resolves settings from configuration
    ///
    /// The seed URL and page budget are required here, and the rest of the
    /// configuration must pass [`validate`].
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let seed = config
            .crawler
            .seed_url
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("seed URL is required".to_string()))?;

        let max_pages = config
            .crawler
            .max_pages
            .ok_or_else(|| ConfigError::Validation("max pages is required".to_string()))?;

        let seed = normalize_seed(seed)?;
        let allowed_host = host_key(&seed).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", seed))
        })?;
        validate(config)?;

        Ok(Self {
            seed,
            allowed_host,
            max_pages,
            concurrency_limit: config.crawler.concurrency_limit,
            user_agent: config.user_agent.robots_token().to_string(),
        })
    }

    /// Overrides the concurrency limit
    ///
    /// A limit of zero would leave every unit waiting for a permit forever,
    /// so it is refused.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Result<Self, CrawlError> {
        if limit == 0 {
            return Err(ConfigError::Validation(
                "concurrency_limit must be >= 1, got 0".to_string(),
            )
            .into());
        }
        self.concurrency_limit = limit;
        Ok(self)
    }

    /// Overrides the robots.txt product token
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Crawl-wide shared handles, passed to every unit of work
struct CrawlContext {
    settings: CrawlSettings,
    transport: Arc<dyn Transport>,
    ledger: VisitLedger,
    robots: RobotsGate,
    scheduler: Scheduler,
    stats: CrawlStats,
    on_visit: Option<VisitCallback>,
}

impl CrawlContext {
    fn pipeline(&self) -> LinkPipeline<'_> {
        LinkPipeline {
            allowed_host: &self.settings.allowed_host,
            user_agent: &self.settings.user_agent,
            robots: &self.robots,
            ledger: &self.ledger,
        }
    }
}

/// A same-host crawl over a fixed page budget
///
/// Each `Crawler` owns its own ledger, robots cache and permit pool, so
/// several can run in one process without sharing state.
pub struct Crawler {
    settings: CrawlSettings,
    transport: Arc<dyn Transport>,
    on_visit: Option<VisitCallback>,
}

impl Crawler {
    /// Creates a crawler that fetches through `transport`
    pub fn new(settings: CrawlSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            on_visit: None,
        }
    }

    /// Creates a crawler backed by the pooled HTTP client
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let settings = CrawlSettings::from_config(config)?;
        let transport = HttpTransport::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::new(settings, Arc::new(transport)))
    }

    /// Registers a callback run once per page before it is fetched
    pub fn on_visit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        self.on_visit = Some(Arc::new(callback));
        self
    }

    /// Runs the crawl to completion
    ///
    /// This method:
    /// 1. Seeds the ledger with the start URL
    /// 2. Checks the start URL against robots.txt
    /// 3. Spawns the seed unit, which fans out recursively
    /// 4. Waits for every spawned unit to finish
    ///
    /// Per-page and per-link failures are handled inside the unit that hit
    /// them; the crawl itself always runs to completion.
    pub async fn run(self) -> CrawlReport {
        let start_time = Instant::now();
        let ctx = Arc::new(CrawlContext {
            robots: RobotsGate::new(Arc::clone(&self.transport)),
            ledger: VisitLedger::new(self.settings.max_pages),
            scheduler: Scheduler::new(self.settings.concurrency_limit),
            stats: CrawlStats::new(),
            transport: self.transport,
            on_visit: self.on_visit,
            settings: self.settings,
        });

        let seed = ctx.settings.seed.clone();
        tracing::info!(
            seed = %seed,
            max_pages = ctx.settings.max_pages,
            concurrency = ctx.settings.concurrency_limit,
            "Starting crawl"
        );

        match ctx.ledger.seed(&seed) {
            ClaimOutcome::Claimed => {
                if ctx.robots.is_allowed(&seed, &ctx.settings.user_agent).await {
                    spawn_unit(&ctx, seed);
                } else {
                    tracing::warn!(url = %seed, "Seed URL disallowed by robots.txt");
                    ctx.stats.record_rejection(&RejectReason::RobotsDenied);
                }
            }
            outcome => {
                tracing::warn!(url = %seed, outcome = ?outcome, "Seed URL could not be claimed");
            }
        }

        tracing::debug!(
            active_units = ctx.scheduler.active_units(),
            permits_in_use = ctx.scheduler.in_use(),
            capacity = ctx.scheduler.capacity(),
            "Waiting for crawl units to finish"
        );
        ctx.scheduler.drain().await;
        debug_assert_eq!(ctx.scheduler.in_use(), 0);

        let report = ctx.stats.report(&ctx.ledger, start_time.elapsed());
        tracing::info!(
            pages = report.pages_crawled,
            fetched = report.fetched,
            failed = report.fetch_failures,
            robots_hosts = ctx.robots.cache().len(),
            "Crawl completed in {:?}",
            report.elapsed
        );
        report
    }
}

/// Spawns a tracked unit of work for a claimed URL
fn spawn_unit(ctx: &Arc<CrawlContext>, url: Url) {
    let unit_ctx = Arc::clone(ctx);
    ctx.scheduler.spawn(run_unit(unit_ctx, url));
}

/// One unit of work: fetch, extract, dispatch
async fn run_unit(ctx: Arc<CrawlContext>, url: Url) {
    let mut state = UnitState::Pending;

    let Some(permit) = ctx.scheduler.acquire().await else {
        return;
    };
    transition(&url, &mut state, UnitState::Fetching);

    ctx.stats.record_visit(&url);
    if let Some(on_visit) = &ctx.on_visit {
        on_visit(&url);
    }

    let body = match ctx.transport.fetch(&url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Fetch failed");
            ctx.stats.record_fetch_failure();
            drop(permit);
            transition(&url, &mut state, UnitState::Done);
            return;
        }
    };
    ctx.stats.record_fetched();
    transition(&url, &mut state, UnitState::Extracting);

    let links = extract_links(&body);
    transition(&url, &mut state, UnitState::Dispatching);

    let pipeline = ctx.pipeline();
    for href in links {
        match pipeline.evaluate(url.as_str(), &href).await {
            LinkOutcome::Accepted(next) => spawn_unit(&ctx, next),
            LinkOutcome::Rejected(reason) => {
                tracing::debug!(from = %url, href = %href, reason = ?reason, "Dropped link");
                ctx.stats.record_rejection(&reason);
            }
        }
    }

    drop(permit);
    transition(&url, &mut state, UnitState::Done);
}

fn transition(url: &Url, state: &mut UnitState, next: UnitState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal unit transition {} -> {}",
        state,
        next
    );
    tracing::trace!(
        url = %url,
        from = %state,
        to = %next,
        holds_permit = next.holds_permit(),
        "Unit transition"
    );
    *state = next;
}
