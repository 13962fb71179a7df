//! Batch scheduler draining the frontier
//!
//! This module handles:
//! - Seeding an empty frontier with the initial URL
//! - Dequeuing batches of at most `max_concurrency` entries
//! - Running one task per entry and waiting for the whole batch
//! - Retrying after storage errors on the next tick, giving up after a run
//!   of consecutive failures

use crate::crawler::worker::Worker;
use crate::state::{CrawlPhase, CrawlSummary};
use crate::storage::{Frontier, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Delay before retrying after a failed dequeue
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Consecutive failed dequeues tolerated before the run ends
pub const DEFAULT_MAX_RETRIES: u32 = 30;

pub struct Scheduler {
    frontier: Frontier,
    worker: Arc<Worker>,
    batch_size: usize,
    retry_delay: Duration,
    max_retries: u32,
    phase: CrawlPhase,
}

impl Scheduler {
    pub fn new(frontier: Frontier, worker: Arc<Worker>, batch_size: usize) -> Self {
        Self {
            frontier,
            worker,
            batch_size: batch_size.max(1),
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
            phase: CrawlPhase::Idle,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Enqueues `initial_url` at depth 0 if the frontier is empty
    ///
    /// Returns whether the seed was added. A non-empty frontier means an
    /// earlier run was interrupted and is resumed as-is.
    pub fn seed(&self, initial_url: &str) -> StorageResult<bool> {
        if !self.frontier.is_empty()? {
            tracing::info!(
                "Resuming with {} URLs already in the frontier",
                self.frontier.len()?
            );
            return Ok(false);
        }

        tracing::info!("Seeding frontier with {}", initial_url);
        self.frontier.enqueue(initial_url, 0)?;
        Ok(true)
    }

    /// Drains the frontier batch by batch until it is empty
    ///
    /// A failed dequeue is retried after the retry delay. Once more than
    /// `max_retries` dequeues in a row have failed, the run stops and the
    /// summary is flagged as aborted; the frontier keeps whatever was left.
    pub async fn run(&mut self) -> CrawlSummary {
        let started = Instant::now();
        let mut summary = CrawlSummary::default();
        let mut consecutive_failures = 0u32;

        loop {
            self.phase = CrawlPhase::Idle;

            let batch = match self.frontier.dequeue_batch(self.batch_size) {
                Ok(batch) => {
                    consecutive_failures = 0;
                    batch
                }
                Err(e) => {
                    summary.storage_errors += 1;
                    consecutive_failures += 1;
                    if consecutive_failures > self.max_retries {
                        tracing::error!(
                            "Giving up after {} consecutive dequeue failures: {}",
                            consecutive_failures,
                            e
                        );
                        summary.aborted = true;
                        break;
                    }
                    tracing::error!(
                        "Failed to dequeue batch (attempt {}), retrying: {}",
                        consecutive_failures,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
            };

            if batch.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            self.phase = CrawlPhase::Draining;
            summary.batches += 1;
            tracing::debug!("Batch {}: {} entries", summary.batches, batch.len());

            let mut tasks = JoinSet::new();
            for entry in batch {
                let worker = Arc::clone(&self.worker);
                tasks.spawn(async move { worker.process(entry).await });
            }

            // Batch barrier
            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(outcome) => summary.record(outcome),
                    Err(e) => tracing::error!("Worker task failed: {}", e),
                }
            }

            let elapsed = started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                summary.processed() as f64 / elapsed
            } else {
                0.0
            };
            tracing::info!(
                "Progress: {} entries handled, {} processed ({:.2} pages/sec), {} queued",
                summary.total(),
                summary.processed(),
                rate,
                self.frontier.len().unwrap_or(0)
            );
        }

        self.phase = CrawlPhase::Idle;
        summary.elapsed = started.elapsed();
        summary
    }
}
