//! Durable crawl frontier
//!
//! Entries are stored as `queueIndex:<url>` → decimal depth. One entry per
//! URL; enqueueing a URL again overwrites its depth. Dequeue order is
//! lexicographic by URL, not insertion order.

use crate::storage::kv::KvStore;
use crate::storage::traits::StorageResult;
use std::sync::Arc;

const QUEUE_PREFIX: &str = "queueIndex:";

/// A URL waiting to be crawled, tagged with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

#[derive(Clone)]
pub struct Frontier {
    store: Arc<KvStore>,
}

impl Frontier {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Adds or overwrites the entry for `url`
    pub fn enqueue(&self, url: &str, depth: u32) -> StorageResult<()> {
        self.store.put(&queue_key(url), &depth.to_string())
    }

    /// Removes and returns the lexicographically-first entry
    ///
    /// Returns `Ok(None)` on an empty frontier.
    pub fn dequeue(&self) -> StorageResult<Option<FrontierEntry>> {
        Ok(self
            .store
            .pop_first(QUEUE_PREFIX)?
            .map(|(key, value)| entry_from_pair(&key, &value)))
    }

    /// Dequeues up to `n` entries, stopping early when the frontier empties
    ///
    /// Each entry is claimed in its own transaction. If a dequeue fails after
    /// some entries were claimed, those entries are returned and the error is
    /// logged, so claimed work is not lost. The error is returned only when
    /// nothing was claimed.
    pub fn dequeue_batch(&self, n: usize) -> StorageResult<Vec<FrontierEntry>> {
        let mut batch = Vec::with_capacity(n);

        while batch.len() < n {
            match self.dequeue() {
                Ok(Some(entry)) => batch.push(entry),
                Ok(None) => break,
                Err(e) if batch.is_empty() => return Err(e),
                Err(e) => {
                    tracing::error!(
                        "Dequeue failed after claiming {} entries, processing partial batch: {}",
                        batch.len(),
                        e
                    );
                    break;
                }
            }
        }

        Ok(batch)
    }

    /// Lists every entry without removing anything
    pub fn read_all(&self) -> StorageResult<Vec<FrontierEntry>> {
        Ok(self
            .store
            .scan_prefix(QUEUE_PREFIX)?
            .iter()
            .map(|(key, value)| entry_from_pair(key, value))
            .collect())
    }

    pub fn len(&self) -> StorageResult<usize> {
        self.store.count_prefix(QUEUE_PREFIX)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drops the entry for `url`, returning whether one existed
    pub fn delete(&self, url: &str) -> StorageResult<bool> {
        self.store.delete(&queue_key(url))
    }
}

fn queue_key(url: &str) -> String {
    format!("{}{}", QUEUE_PREFIX, url)
}

fn entry_from_pair(key: &str, value: &str) -> FrontierEntry {
    let url = key.strip_prefix(QUEUE_PREFIX).unwrap_or(key);
    let depth = value.parse().unwrap_or_else(|_| {
        tracing::warn!("Corrupt depth {:?} for {}, using 0", value, url);
        0
    });
    FrontierEntry::new(url, depth)
}
