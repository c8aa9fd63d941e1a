//! SQLite-backed durable store.
//!
//! # Invariants
//! - All entries live in the single `entries` table created by migration 1.
//! - Capacity checks and the write they guard run in one immediate transaction.
//! - Enumeration is ordered by key.

use super::{entry_size, KeyValueStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

/// Durable store over a migrated SQLite connection.
pub struct SqliteStore {
    conn: Connection,
    capacity_bytes: Option<u64>,
}

impl SqliteStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>, capacity_bytes: Option<u64>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Ok(Self::from_connection(conn, capacity_bytes))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(capacity_bytes: Option<u64>) -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_connection(conn, capacity_bytes))
    }

    /// Wraps a connection that already went through `open_db*`.
    pub fn from_connection(conn: Connection, capacity_bytes: Option<u64>) -> Self {
        Self {
            conn,
            capacity_bytes,
        }
    }

    /// Bytes currently charged against capacity.
    pub fn used_bytes(&self) -> StoreResult<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
             FROM entries;",
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(used).unwrap_or(0))
    }

    /// Borrow of the underlying connection, mainly for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let capacity_bytes = self.capacity_bytes;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(capacity_bytes) = capacity_bytes {
            let others: i64 = tx.query_row(
                "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
                 FROM entries
                 WHERE key != ?1;",
                [key],
                |row| row.get(0),
            )?;
            let required_bytes = u64::try_from(others).unwrap_or(0) + entry_size(key, value);
            if required_bytes > capacity_bytes {
                // Dropping `tx` rolls back.
                return Err(StoreError::QuotaExceeded {
                    required_bytes,
                    capacity_bytes,
                });
            }
        }

        tx.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        // substr() instead of LIKE: `_` in prefixes such as `note_` is a LIKE wildcard.
        let mut stmt = self.conn.prepare(
            "SELECT key
             FROM entries
             WHERE substr(key, 1, ?2) = ?1
             ORDER BY key ASC;",
        )?;
        let prefix_chars = i64::try_from(prefix.chars().count()).unwrap_or(i64::MAX);
        let mut rows = stmt.query(params![prefix, prefix_chars])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}
