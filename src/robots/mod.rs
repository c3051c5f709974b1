//! Robots.txt handling module
//!
//! This module provides the per-host robots gate: it fetches robots.txt once
//! per host, caches the policy text for the rest of the crawl, and evaluates
//! URLs against it.

mod cache;
mod parser;

pub use cache::PolicyCache;
pub use parser::RobotsPolicy;

use crate::crawler::Transport;
use crate::url::{host_key, robots_url};
use std::sync::Arc;
use url::Url;

/// Decides whether URLs may be fetched under their host's robots.txt
pub struct RobotsGate {
    transport: Arc<dyn Transport>,
    cache: PolicyCache,
}

impl RobotsGate {
    /// Creates a gate that fetches policies through `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: PolicyCache::new(),
        }
    }

    /// Checks if `url` is allowed for `user_agent`
    ///
    /// On the first URL seen for a host this fetches
    /// `{scheme}://{host}/robots.txt`. A failed fetch (network error, timeout,
    /// non-success status) is logged and cached as an empty policy, which
    /// allows everything.
    pub async fn is_allowed(&self, url: &Url, user_agent: &str) -> bool {
        let Some(host) = host_key(url) else {
            return false;
        };

        let policy = self
            .cache
            .get_or_fetch(&host, || self.fetch_policy(url, &host))
            .await;

        policy.is_allowed(url.as_str(), user_agent)
    }

    /// The policies resolved so far
    pub fn cache(&self) -> &PolicyCache {
        &self.cache
    }

    async fn fetch_policy(&self, url: &Url, host: &str) -> RobotsPolicy {
        let Some(location) = robots_url(url) else {
            return RobotsPolicy::allow_all();
        };

        match self.transport.fetch(&location).await {
            Ok(body) => {
                tracing::info!(host = %host, bytes = body.len(), "Fetched robots.txt");
                RobotsPolicy::from_content(&String::from_utf8_lossy(&body))
            }
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "No robots.txt available, continuing unrestricted");
                RobotsPolicy::allow_all()
            }
        }
    }
}
