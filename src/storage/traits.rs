//! Storage traits and error types
//!
//! This module defines the page store interface and the error type shared
//! by every storage backend.

use crate::storage::{PageRecord, PageSearch, PageSearchWithFrequency};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable home of crawled page records
///
/// The crawl engine only inserts records and, during recovery, lists the
/// URLs of visited ones. The search methods back the `--search` CLI mode.
/// Implementations are shared between workers, so every method takes `&self`.
pub trait PageStore: Send + Sync {
    /// Persists one page record
    fn insert_page(&self, page: &PageRecord) -> StorageResult<()>;

    /// Gets the most recent record for a URL
    fn find_page_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Lists the URL of every record flagged visited
    fn list_visited_urls(&self) -> StorageResult<Vec<String>>;

    /// Case-insensitive substring match on title or description
    fn search_by_title_or_description(&self, term: &str) -> StorageResult<Vec<PageSearch>>;

    /// Pages containing the word, highest frequency first
    fn search_by_word_frequency(&self, word: &str) -> StorageResult<Vec<PageSearchWithFrequency>>;

    /// Union of both searches, de-duplicated and ordered by URL
    fn search(&self, term: &str) -> StorageResult<Vec<PageSearch>> {
        let mut results: Vec<PageSearch> = self
            .search_by_word_frequency(&term.to_lowercase())?
            .into_iter()
            .map(|hit| PageSearch {
                url: hit.url,
                title: hit.title,
            })
            .collect();
        results.extend(self.search_by_title_or_description(term)?);

        results.sort_by(|a, b| a.url.cmp(&b.url));
        results.dedup_by(|a, b| a.url == b.url);
        Ok(results)
    }
}
