//! Ordered key-value store backing the frontier and visited index
//!
//! Both indexes share one table and are separated by key prefix
//! (`queueIndex:<url>`, `visitedIndex:<url>`). The connection is guarded by a
//! mutex so there is a single writer. Normal operations hold the write gate
//! in shared mode; compaction takes it exclusively.

use crate::config::CacheMode;
use crate::storage::schema::initialize_kv_schema;
use crate::storage::traits::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard};

/// File name of the on-disc cache inside the cache directory
pub const CACHE_FILE_NAME: &str = "cache.sqlite3";

pub struct KvStore {
    conn: Mutex<Connection>,
    write_gate: RwLock<()>,
    memory: bool,
}

impl KvStore {
    /// Opens the store selected by the cache mode
    pub fn open(mode: CacheMode, dir: &Path) -> StorageResult<Self> {
        match mode {
            CacheMode::Mem => Self::open_in_memory(),
            CacheMode::Disc => Self::open_on_disc(dir),
        }
    }

    /// Creates a store that lives only as long as the process
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_kv_schema(&conn)?;
        Ok(Self::from_connection(conn, true))
    }

    /// Opens or creates the on-disc store under `dir`
    pub fn open_on_disc(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(CACHE_FILE_NAME))?;

        // auto_vacuum only takes effect if set before the first table exists
        conn.execute_batch(
            "
            PRAGMA auto_vacuum = INCREMENTAL;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_kv_schema(&conn)?;

        Ok(Self::from_connection(conn, false))
    }

    fn from_connection(conn: Connection, memory: bool) -> Self {
        Self {
            conn: Mutex::new(conn),
            write_gate: RwLock::new(()),
            memory,
        }
    }

    pub fn is_memory(&self) -> bool {
        self.memory
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::LockPoisoned("kv connection"))
    }

    fn shared(&self) -> StorageResult<RwLockReadGuard<'_, ()>> {
        self.write_gate
            .read()
            .map_err(|_| StorageError::LockPoisoned("kv write gate"))
    }

    /// Inserts or overwrites a key
    pub fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let _gate = self.shared()?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Inserts or overwrites many keys in one transaction
    pub fn put_many(&self, pairs: &[(String, String)]) -> StorageResult<usize> {
        if pairs.is_empty() {
            return Ok(0);
        }

        let _gate = self.shared()?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in pairs {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;

        Ok(pairs.len())
    }

    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn contains(&self, key: &str) -> StorageResult<bool> {
        let found = self
            .conn()?
            .query_row("SELECT 1 FROM kv WHERE key = ?1", [key], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Removes a key, returning whether it existed
    pub fn delete(&self, key: &str) -> StorageResult<bool> {
        let _gate = self.shared()?;
        let removed = self.conn()?.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    /// Removes and returns the lexicographically first key with the prefix
    ///
    /// Selection and removal happen in one immediate transaction.
    pub fn pop_first(&self, prefix: &str) -> StorageResult<Option<(String, String)>> {
        let _gate = self.shared()?;
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let first: Option<(String, String)> = tx
            .query_row(
                "SELECT key, value FROM kv
                 WHERE key >= ?1 AND (?2 IS NULL OR key < ?2)
                 ORDER BY key LIMIT 1",
                params![prefix, prefix_end(prefix)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((key, _)) = &first {
            tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        }
        tx.commit()?;

        Ok(first)
    }

    /// Returns every key/value pair with the prefix, in key order
    pub fn scan_prefix(&self, prefix: &str) -> StorageResult<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT key, value FROM kv
             WHERE key >= ?1 AND (?2 IS NULL OR key < ?2)
             ORDER BY key",
        )?;

        let rows = stmt
            .query_map(params![prefix, prefix_end(prefix)], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn count_prefix(&self, prefix: &str) -> StorageResult<usize> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM kv WHERE key >= ?1 AND (?2 IS NULL OR key < ?2)",
            params![prefix, prefix_end(prefix)],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Checkpoints the write-ahead log and returns free pages to the OS
    ///
    /// Holds the write gate exclusively, so no other write runs meanwhile.
    /// A no-op for memory-backed stores.
    pub fn compact(&self) -> StorageResult<()> {
        let _exclusive = self
            .write_gate
            .write()
            .map_err(|_| StorageError::LockPoisoned("kv write gate"))?;

        if self.memory {
            return Ok(());
        }

        let conn = self.conn()?;
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;

        let mut stmt = conn.prepare("PRAGMA incremental_vacuum")?;
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}

        Ok(())
    }
}

#[cfg(test)]
impl KvStore {
    /// Poisons the connection mutex so every later operation fails
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _conn = self.conn.lock();
            panic!("poisoning kv connection");
        }));
    }

    pub(crate) fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }
}

/// Smallest string greater than every string starting with `prefix`
///
/// `None` when no such bound exists, meaning the range is open-ended.
fn prefix_end(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = char::from_u32(last as u32 + 1) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}
