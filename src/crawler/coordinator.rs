//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the crawl together:
//! - Opening the frontier/visited cache and the page store
//! - Reconciling the visited index with the page store on startup
//! - Starting background compaction of the on-disc cache
//! - Seeding the frontier and running the scheduler to completion

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::worker::Worker;
use crate::link::LinkPolicy;
use crate::state::CrawlSummary;
use crate::storage::{
    spawn_compaction, Frontier, KvStore, PageStore, SqlitePageStore, StorageResult, VisitedIndex,
};
use crate::CrawlerError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    store: Arc<KvStore>,
    frontier: Frontier,
    visited: VisitedIndex,
    pages: Arc<dyn PageStore>,
    fetcher: Arc<Fetcher>,
}

impl Coordinator {
    /// Opens the stores named in the configuration and builds the fetcher
    ///
    /// Failing to open either store is fatal.
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let store = Arc::new(KvStore::open(config.cache.mode, &config.cache.dir)?);
        tracing::info!(
            "Opened {:?} cache{}",
            config.cache.mode,
            if store.is_memory() {
                String::new()
            } else {
                format!(" in {}", config.cache.dir.display())
            }
        );

        let pages: Arc<dyn PageStore> =
            Arc::new(SqlitePageStore::new(Path::new(&config.output.database_path))?);
        tracing::info!("Opened page store {}", config.output.database_path);

        let fetcher = Fetcher::new(&config)?;

        Ok(Self::with_stores(config, store, pages, fetcher))
    }

    /// Builds a coordinator around already-open stores
    pub fn with_stores(
        config: Config,
        store: Arc<KvStore>,
        pages: Arc<dyn PageStore>,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            frontier: Frontier::new(Arc::clone(&store)),
            visited: VisitedIndex::new(Arc::clone(&store)),
            config,
            store,
            pages,
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedIndex {
        &self.visited
    }

    pub fn pages(&self) -> &dyn PageStore {
        self.pages.as_ref()
    }

    /// Marks every URL recorded in the page store as visited
    pub fn sync(&self) -> StorageResult<usize> {
        self.visited.sync(self.pages.as_ref())
    }

    /// Runs the crawl until the frontier is empty
    ///
    /// # Process
    ///
    /// 1. Recovery sync (a failure is logged, the crawl continues)
    /// 2. Start compaction for a disc-backed cache
    /// 3. Seed the frontier if it is empty
    /// 4. Drain the frontier in batches
    pub async fn run(self) -> CrawlSummary {
        if let Err(e) = self.sync() {
            tracing::warn!("Recovery sync failed, continuing without it: {}", e);
        }

        let compaction = spawn_compaction(
            Arc::clone(&self.store),
            Duration::from_secs(self.config.cache.compaction_interval_secs),
        );

        let worker = Arc::new(Worker::new(
            self.frontier.clone(),
            self.visited.clone(),
            Arc::clone(&self.pages),
            Arc::clone(&self.fetcher),
            Arc::new(LinkPolicy::from_config(&self.config.filter)),
            self.config.crawler.max_depth,
        ));
        let mut scheduler = Scheduler::new(
            self.frontier.clone(),
            worker,
            self.config.crawler.max_concurrency,
        );

        if let Err(e) = scheduler.seed(&self.config.crawler.initial_url) {
            tracing::error!("Failed to seed frontier: {}", e);
        }

        tracing::info!(
            "Starting crawl (max concurrency {}, max depth {})",
            self.config.crawler.max_concurrency,
            self.config.crawler.max_depth
        );

        let summary = scheduler.run().await;

        if let Some(handle) = compaction {
            handle.abort();
        }

        summary.log();
        summary
    }
}

/// Runs a complete crawl with the given configuration
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CrawlerError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
