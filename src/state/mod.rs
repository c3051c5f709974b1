//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitLedger`: the shared claim set and page budget
//! - `UnitState`: the lifecycle of a single unit of work

mod ledger;
mod unit_state;

// Re-export main types
pub use ledger::{ClaimOutcome, VisitLedger};
pub use unit_state::UnitState;
