//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Whether the scheduler is waiting for work or draining a batch
//! - `PageOutcome`: What happened to a single dequeued frontier entry
//! - `CrawlSummary`: Per-outcome totals for a whole run

mod outcome;
mod summary;

// Re-export main types
pub use outcome::PageOutcome;
pub use summary::CrawlSummary;

/// Scheduler phase
///
/// The crawl alternates `Idle → Draining → Idle` and stops when a dequeue in
/// the `Idle` phase returns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Between batches; the next step is a dequeue
    Idle,

    /// Workers of the current batch are in flight
    Draining,
}
