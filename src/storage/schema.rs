//! Database schema definitions
//!
//! Two databases are used: the crawl cache (frontier and visited index as
//! one ordered key-value table) and the page store.

use rusqlite::Connection;

/// Ordered key-value table backing the frontier and visited index
///
/// `WITHOUT ROWID` keeps rows clustered by key, so prefix scans return keys
/// in lexicographic (BINARY collation) order.
pub const KV_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL DEFAULT ''
) WITHOUT ROWID;
"#;

/// Page records written by the crawler
///
/// `links`, `meta` and `words` hold JSON documents.
pub const PAGES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    links TEXT NOT NULL DEFAULT '[]',
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    meta TEXT NOT NULL DEFAULT '[]',
    visited INTEGER NOT NULL DEFAULT 0,
    timestamp TEXT NOT NULL,
    words TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);
"#;

pub fn initialize_kv_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(KV_SCHEMA_SQL)
}

pub fn initialize_pages_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(PAGES_SCHEMA_SQL)
}
