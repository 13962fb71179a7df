//! Per-URL crawl pipeline

use crate::crawler::extract::{extract_data, extract_links};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::words::count_words;
use crate::link::{admit, LinkPolicy};
use crate::state::PageOutcome;
use crate::storage::{Frontier, FrontierEntry, PageRecord, PageStore, VisitedIndex};
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Processes one frontier entry from depth check to enqueueing its children
///
/// Shared by every task of a batch.
pub struct Worker {
    frontier: Frontier,
    visited: VisitedIndex,
    pages: Arc<dyn PageStore>,
    fetcher: Arc<Fetcher>,
    policy: Arc<LinkPolicy>,
    max_depth: u32,
}

impl Worker {
    pub fn new(
        frontier: Frontier,
        visited: VisitedIndex,
        pages: Arc<dyn PageStore>,
        fetcher: Arc<Fetcher>,
        policy: Arc<LinkPolicy>,
        max_depth: u32,
    ) -> Self {
        Self {
            frontier,
            visited,
            pages,
            fetcher,
            policy,
            max_depth,
        }
    }

    /// Runs the pipeline for one entry
    ///
    /// The visited check and the final mark are not atomic, so two workers
    /// may process the same URL if it was enqueued twice before either
    /// finished.
    pub async fn process(&self, entry: FrontierEntry) -> PageOutcome {
        let FrontierEntry { url, depth } = entry;

        if depth > self.max_depth {
            tracing::debug!("Dropping {} at depth {} (max {})", url, depth, self.max_depth);
            return PageOutcome::DepthExceeded;
        }

        if self.visited.is_visited(&url) {
            tracing::debug!("Already visited: {}", url);
            return PageOutcome::AlreadyVisited;
        }

        let parent = match Url::parse(&url) {
            Ok(parent) => parent,
            Err(e) => {
                tracing::warn!("Invalid frontier URL {}: {}", url, e);
                self.mark_visited(&url);
                return PageOutcome::FetchFailed;
            }
        };

        tracing::debug!("Fetching {} (depth {})", url, depth);
        let fetched = match self.fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(FetchError::MimeNotAllowed { content_type, .. }) => {
                tracing::info!("Skipping {}: content type {:?} not allowed", url, content_type);
                self.mark_visited(&url);
                return PageOutcome::MimeNotAllowed;
            }
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.mark_visited(&url);
                return PageOutcome::FetchFailed;
            }
        };

        let links = extract_links(&parent, &fetched.document, &self.policy);
        let data = extract_data(&fetched.document);
        let words = count_words(&fetched.raw);

        let record = PageRecord {
            url: url.clone(),
            links,
            title: data.title,
            description: data.description,
            meta: data.meta,
            visited: true,
            timestamp: Utc::now(),
            words,
        };

        if let Err(e) = self.pages.insert_page(&record) {
            // Left unvisited so a later run fetches it again
            tracing::error!("Failed to store page {}: {}", url, e);
            return PageOutcome::StoreFailed;
        }

        self.mark_visited(&url);

        let child_depth = depth.saturating_add(1);
        let mut links_enqueued = 0;
        for link in &record.links {
            match admit(link, &self.policy) {
                Ok(_) => match self.frontier.enqueue(link, child_depth) {
                    Ok(()) => links_enqueued += 1,
                    Err(e) => tracing::warn!("Failed to enqueue {}: {}", link, e),
                },
                Err(rejection) => tracing::debug!("Not admitting {}: {}", link, rejection),
            }
        }

        tracing::info!(
            "Processed {} (depth {}, {} of {} links enqueued)",
            url,
            depth,
            links_enqueued,
            record.links.len()
        );

        PageOutcome::Processed { links_enqueued }
    }

    fn mark_visited(&self, url: &str) {
        if let Err(e) = self.visited.mark_visited(url) {
            tracing::warn!("Failed to mark {} visited: {}", url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{KvStore, SqlitePageStore};

    fn worker(max_depth: u32) -> (Worker, Frontier, VisitedIndex) {
        let store = Arc::new(KvStore::open_in_memory().unwrap());
        let frontier = Frontier::new(Arc::clone(&store));
        let visited = VisitedIndex::new(store);
        let pages: Arc<dyn PageStore> = Arc::new(SqlitePageStore::open_in_memory().unwrap());
        let fetcher = Arc::new(Fetcher::new(&Config::default()).unwrap());

        let worker = Worker::new(
            frontier.clone(),
            visited.clone(),
            pages,
            fetcher,
            Arc::new(LinkPolicy::default()),
            max_depth,
        );
        (worker, frontier, visited)
    }

    #[tokio::test]
    async fn test_depth_checked_before_anything_else() {
        let (worker, _, visited) = worker(1);
        let outcome = worker
            .process(FrontierEntry::new("https://example.invalid/", 2))
            .await;

        assert_eq!(outcome, PageOutcome::DepthExceeded);
        assert!(!visited.is_visited("https://example.invalid/"));
    }

    #[tokio::test]
    async fn test_visited_url_skipped() {
        let (worker, _, visited) = worker(2);
        visited.mark_visited("https://example.invalid/").unwrap();

        let outcome = worker
            .process(FrontierEntry::new("https://example.invalid/", 0))
            .await;
        assert_eq!(outcome, PageOutcome::AlreadyVisited);
    }

    #[tokio::test]
    async fn test_invalid_url_marked_visited() {
        let (worker, frontier, visited) = worker(2);
        let outcome = worker.process(FrontierEntry::new("not a url", 0)).await;

        assert_eq!(outcome, PageOutcome::FetchFailed);
        assert!(visited.is_visited("not a url"));
        assert!(frontier.is_empty().unwrap());
    }
}
