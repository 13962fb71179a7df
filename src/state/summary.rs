//! Run totals collected by the scheduler

use crate::state::PageOutcome;
use std::collections::HashMap;
use std::time::Duration;

/// Per-outcome counters for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Count of entries by outcome name
    pub outcomes: HashMap<&'static str, usize>,

    /// Children enqueued across all processed pages
    pub links_enqueued: usize,

    /// Number of batches drained
    pub batches: usize,

    /// Entries that ended in a success, skip or error outcome
    succeeded: usize,
    skipped: usize,
    failed: usize,

    /// Entries whose URL was added to the visited index
    pub marked_visited: usize,

    /// Failed dequeue attempts
    pub storage_errors: usize,

    /// Set when the run stopped on repeated storage errors
    pub aborted: bool,

    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn record(&mut self, outcome: PageOutcome) {
        if let PageOutcome::Processed { links_enqueued } = outcome {
            self.links_enqueued += links_enqueued;
        }
        if outcome.is_success() {
            self.succeeded += 1;
        } else if outcome.is_skipped() {
            self.skipped += 1;
        } else if outcome.is_error() {
            self.failed += 1;
        }
        if outcome.marks_visited() {
            self.marked_visited += 1;
        }
        *self.outcomes.entry(outcome.as_str()).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: PageOutcome) -> usize {
        self.outcomes.get(outcome.as_str()).copied().unwrap_or(0)
    }

    /// Total number of dequeued entries
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn processed(&self) -> usize {
        self.succeeded
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Logs the end-of-run report
    pub fn log(&self) {
        if self.aborted {
            tracing::error!(
                "Crawl stopped after {} storage errors; the frontier is kept for the next run",
                self.storage_errors
            );
        }

        tracing::info!(
            "Crawl {} in {:.1}s: {} entries in {} batches ({} processed, {} skipped, {} failed, {} marked visited), {} links enqueued",
            if self.aborted { "stopped" } else { "complete" },
            self.elapsed.as_secs_f64(),
            self.total(),
            self.batches,
            self.processed(),
            self.skipped(),
            self.failed(),
            self.marked_visited,
            self.links_enqueued
        );

        // Sort outcomes by count (descending)
        let mut counts: Vec<_> = self.outcomes.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (outcome, count) in counts {
            tracing::debug!("  {}: {}", outcome, count);
        }
    }
}
