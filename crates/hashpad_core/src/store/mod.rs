//! Key-value store handle behind note persistence.
//!
//! # Responsibility
//! - Define the narrow put/get/delete/enumerate contract the note repository
//!   is written against.
//! - Classify write failures into capacity exhaustion vs everything else.
//!
//! # Invariants
//! - `set` either fully replaces the value under `key` or leaves the store
//!   untouched.
//! - A rejected `set` over capacity never evicts anything on its own.
//! - Capacity is measured as the byte length of every key plus its value.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    /// The write would push the store past its capacity.
    QuotaExceeded {
        required_bytes: u64,
        capacity_bytes: u64,
    },
    /// Backend refused the operation for a non-capacity reason.
    Unavailable(String),
    /// SQLite transport or schema failure.
    Db(DbError),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                required_bytes,
                capacity_bytes,
            } => write!(
                f,
                "store quota exceeded: {required_bytes} bytes required, capacity is {capacity_bytes}"
            ),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-to-string store shared by every note.
///
/// Access is single-threaded; implementations need no internal locking.
pub trait KeyValueStore {
    /// Returns the raw value under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value under `key` in one put.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
    /// Enumerates every key in a deterministic order.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Enumerates keys starting with `prefix`, preserving `keys()` order.
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}

/// Bytes charged against capacity for one entry.
pub(crate) fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
