//! SQLite page store
//!
//! This module provides a SQLite-based implementation of the PageStore trait.

use crate::storage::schema::initialize_pages_schema;
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use crate::storage::{PageRecord, PageSearch, PageSearchWithFrequency};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const PAGE_COLUMNS: &str = "url, links, title, description, meta, visited, timestamp, words";

/// SQLite page store backend
pub struct SqlitePageStore {
    conn: Mutex<Connection>,
}

impl SqlitePageStore {
    /// Opens or creates the page database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_pages_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory page store
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_pages_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::LockPoisoned("page store connection"))
    }
}

/// Raw column values, decoded outside the rusqlite row closure
struct PageRow {
    url: String,
    links: String,
    title: String,
    description: String,
    meta: String,
    visited: bool,
    timestamp: String,
    words: String,
}

impl PageRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            url: row.get(0)?,
            links: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            meta: row.get(4)?,
            visited: row.get(5)?,
            timestamp: row.get(6)?,
            words: row.get(7)?,
        })
    }

    fn into_record(self) -> StorageResult<PageRecord> {
        Ok(PageRecord {
            url: self.url,
            links: serde_json::from_str(&self.links)?,
            title: self.title,
            description: self.description,
            meta: serde_json::from_str(&self.meta)?,
            visited: self.visited,
            timestamp: DateTime::parse_from_rfc3339(&self.timestamp)?.with_timezone(&Utc),
            words: serde_json::from_str(&self.words)?,
        })
    }
}

/// Escapes LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl PageStore for SqlitePageStore {
    fn insert_page(&self, page: &PageRecord) -> StorageResult<()> {
        let links = serde_json::to_string(&page.links)?;
        let meta = serde_json::to_string(&page.meta)?;
        let words = serde_json::to_string(&page.words)?;

        self.conn()?.execute(
            &format!(
                "INSERT INTO pages ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                PAGE_COLUMNS
            ),
            params![
                page.url,
                links,
                page.title,
                page.description,
                meta,
                page.visited,
                page.timestamp.to_rfc3339(),
                words,
            ],
        )?;
        Ok(())
    }

    fn find_page_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let row = self
            .conn()?
            .query_row(
                &format!(
                    "SELECT {} FROM pages WHERE url = ?1 ORDER BY id DESC LIMIT 1",
                    PAGE_COLUMNS
                ),
                [url],
                PageRow::from_row,
            )
            .optional()?;

        row.map(PageRow::into_record).transpose()
    }

    fn list_visited_urls(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT url FROM pages WHERE visited = 1")?;
        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }

    fn search_by_title_or_description(&self, term: &str) -> StorageResult<Vec<PageSearch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT url, title FROM pages
             WHERE title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
             ORDER BY url",
        )?;

        let results = stmt
            .query_map([like_pattern(term)], |row| {
                Ok(PageSearch {
                    url: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    fn search_by_word_frequency(&self, word: &str) -> StorageResult<Vec<PageSearchWithFrequency>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.url, p.title, j.value
             FROM pages p, json_each(p.words) j
             WHERE j.key = ?1
             ORDER BY j.value DESC, p.url",
        )?;

        let results = stmt
            .query_map([word], |row| {
                Ok(PageSearchWithFrequency {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    frequency: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }
}
