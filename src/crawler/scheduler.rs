//! Bounded-concurrency scheduling for units of work
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore (the permit pool)
//! - Completion tracking for the transitive closure of spawned units

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::task::TaskTracker;

/// Spawns units of work and bounds how many of them are active
///
/// Every unit is spawned through the scheduler so that [`drain`](Self::drain)
/// can wait for all of them, including units spawned by other units. A unit
/// holds a permit only while it fetches and parses; waiting for a permit is
/// the crawl's only backpressure.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    permits: Arc<Semaphore>,

    /// Capacity the semaphore was created with
    capacity: usize,

    /// Tracks every spawned unit until it finishes
    tracker: TaskTracker,
}

impl Scheduler {
    /// Creates a scheduler with `capacity` permits
    ///
    /// The pool always has at least one permit; an empty pool would never
    /// let a unit start.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            tracker: TaskTracker::new(),
        }
    }

    /// Spawns a tracked unit of work
    pub fn spawn<F>(&self, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(unit);
    }

    /// Waits for a permit
    ///
    /// Returns `None` only if the pool has been closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permits).acquire_owned().await.ok()
    }

    /// Waits until every spawned unit, and every unit they spawned, is done
    ///
    /// Units may keep spawning while this waits; the wait ends only when no
    /// tracked unit remains.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Number of permits currently held
    pub fn in_use(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Total number of permits
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of spawned units that have not finished
    pub fn active_units(&self) -> usize {
        self.tracker.len()
    }
}
