//! Webcrawler: a durable breadth-first crawler for the web and overlay networks
//!
//! This crate drains a persistent frontier in bounded batches, fetching each
//! page through a direct, forward-proxy, or overlay-network transport,
//! extracting its links, metadata, and word frequencies, and recording the
//! results so an interrupted crawl picks up where it left off.

pub mod config;
pub mod crawler;
pub mod link;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use link::{admit, prepare_link, LinkPolicy, LinkRejection};
pub use state::{CrawlSummary, PageOutcome};
pub use storage::{Frontier, FrontierEntry, KvStore, PageRecord, PageStore, VisitedIndex};
