//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through a direct, proxy or overlay transport
//! - HTML parsing into an owned document tree
//! - Metadata, link and word-frequency extraction
//! - Batch scheduling and overall crawl coordination

mod coordinator;
mod document;
mod extract;
mod fetcher;
mod scheduler;
mod stopwords;
mod words;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use document::{DocNode, Document, NodeKind, Walk};
pub use extract::{extract_data, extract_links, PageFragment};
pub use fetcher::{
    build_http_client, is_allowed_mime, FetchError, Fetched, Fetcher, HelperListHook,
    LogHelperHook, Transport, OVERLAY_HOST_SUFFIX,
};
pub use scheduler::{Scheduler, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
pub use stopwords::is_stop_word;
pub use words::count_words;
pub use worker::Worker;

use crate::config::Config;
use crate::state::CrawlSummary;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the frontier/visited cache and the page store
/// 2. Reconcile the visited index with stored pages
/// 3. Seed the frontier if it is empty
/// 4. Drain the frontier batch by batch
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl ran until the frontier was empty
/// * `Err(CrawlerError)` - A store could not be opened or the client could not be built
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlerError> {
    run_crawl(config).await
}
