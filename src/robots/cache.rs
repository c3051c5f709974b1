//! Per-host robots.txt policy cache
//!
//! Each host gets a single-initialization slot. The map lock is held only to
//! look up or create the slot; the fetch itself runs outside it, and concurrent
//! first lookups for the same host wait on the same initialization.

use crate::robots::RobotsPolicy;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<RobotsPolicy>>;

/// Host → policy text, filled lazily and never evicted
#[derive(Debug, Default)]
pub struct PolicyCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl PolicyCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached policy for `host`, running `fetch` on first access
    ///
    /// `fetch` runs at most once per host for the lifetime of the cache.
    pub async fn get_or_fetch<F, Fut>(&self, host: &str, fetch: F) -> RobotsPolicy
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RobotsPolicy>,
    {
        let slot = self.slot(host);
        slot.get_or_init(fetch).await.clone()
    }

    /// Returns the policy for `host` if it has already been resolved
    pub fn get(&self, host: &str) -> Option<RobotsPolicy> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(host).and_then(|slot| slot.get().cloned())
    }

    /// Number of hosts whose policy has been resolved
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    /// Returns true when no host policy has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, host: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(host.to_string()).or_default().clone()
    }
}
