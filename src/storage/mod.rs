//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - The ordered key-value cache holding the frontier and visited index
//! - Background compaction of the on-disc cache
//! - The SQLite page store and its search queries

mod frontier;
mod kv;
mod maintenance;
mod schema;
mod sqlite;
mod traits;
mod visited;

pub use frontier::{Frontier, FrontierEntry};
pub use kv::{KvStore, CACHE_FILE_NAME};
pub use maintenance::spawn_compaction;
pub use sqlite::SqlitePageStore;
pub use traits::{PageStore, StorageError, StorageResult};
pub use visited::VisitedIndex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One crawl of one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub links: Vec<String>,
    pub title: String,
    pub description: String,
    pub meta: Vec<String>,
    pub visited: bool,
    pub timestamp: DateTime<Utc>,
    pub words: HashMap<String, u32>,
}

impl PageRecord {
    /// Creates an empty, visited record stamped with the current time
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            links: Vec::new(),
            title: String::new(),
            description: String::new(),
            meta: Vec::new(),
            visited: true,
            timestamp: Utc::now(),
            words: HashMap::new(),
        }
    }
}

/// A search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSearch {
    pub url: String,
    pub title: String,
}

/// A word-frequency search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSearchWithFrequency {
    pub url: String,
    pub title: String,
    pub frequency: u32,
}
