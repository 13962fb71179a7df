//! Durable set of URLs that have been processed
//!
//! Stored as `visitedIndex:<url>` → empty value in the same key-value store as
//! the frontier. Marks are never removed; they can be rebuilt from the page
//! store with [`VisitedIndex::sync`].

use crate::storage::kv::KvStore;
use crate::storage::traits::{PageStore, StorageResult};
use std::sync::Arc;

const VISITED_PREFIX: &str = "visitedIndex:";

#[derive(Clone)]
pub struct VisitedIndex {
    store: Arc<KvStore>,
}

impl VisitedIndex {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Returns true if the URL was already processed
    ///
    /// A storage failure reads as "not visited" so the URL is retried rather
    /// than silently skipped.
    pub fn is_visited(&self, url: &str) -> bool {
        match self.store.contains(&visited_key(url)) {
            Ok(visited) => visited,
            Err(e) => {
                tracing::warn!("Visited lookup failed for {}, treating as unvisited: {}", url, e);
                false
            }
        }
    }

    pub fn mark_visited(&self, url: &str) -> StorageResult<()> {
        self.store.put(&visited_key(url), "")
    }

    pub fn len(&self) -> StorageResult<usize> {
        self.store.count_prefix(VISITED_PREFIX)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Marks every URL the page store records as visited
    ///
    /// Returns the number of URLs marked.
    pub fn sync(&self, pages: &dyn PageStore) -> StorageResult<usize> {
        let urls = pages.list_visited_urls()?;
        if urls.is_empty() {
            tracing::debug!("No visited pages to sync");
            return Ok(0);
        }

        let pairs: Vec<(String, String)> = urls
            .iter()
            .map(|url| (visited_key(url), String::new()))
            .collect();
        let marked = self.store.put_many(&pairs)?;

        tracing::info!("Synced {} visited URLs from the page store", marked);
        Ok(marked)
    }
}

fn visited_key(url: &str) -> String {
    format!("{}{}", VISITED_PREFIX, url)
}
