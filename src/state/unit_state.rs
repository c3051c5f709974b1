//! Lifecycle of one crawl unit of work
//!
//! Each claimed URL is processed by exactly one unit, which moves through
//! `Pending → Fetching → Extracting → Dispatching → Done`. Fetch failures jump
//! straight from `Fetching` to `Done`; there is no separate failed state.

use std::fmt;

/// Represents where a unit of work is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// Spawned, waiting for a concurrency permit
    Pending,

    /// Holding a permit, page fetch in flight
    Fetching,

    /// Body received, hrefs being tokenized out of it
    Extracting,

    /// Links being normalized, filtered, gated and claimed
    Dispatching,

    /// Finished; the permit has been released
    Done,
}

impl UnitState {
    /// Returns true while the unit holds a concurrency permit
    pub fn holds_permit(&self) -> bool {
        matches!(self, Self::Fetching | Self::Extracting | Self::Dispatching)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: UnitState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Done)
                | (Self::Extracting, Self::Dispatching)
                | (Self::Dispatching, Self::Done)
        )
    }

    /// Short lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Dispatching => "dispatching",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
