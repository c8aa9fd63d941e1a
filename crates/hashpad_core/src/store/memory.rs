//! In-memory store used for tests and ephemeral sessions.

use super::{entry_size, KeyValueStore, StoreError, StoreResult};
use std::collections::BTreeMap;

/// BTreeMap-backed store with optional capacity.
///
/// Enumeration order is lexicographic by key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    capacity_bytes: Option<u64>,
    read_only: bool,
}

impl MemoryStore {
    /// Creates an unbounded empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that rejects writes past `capacity_bytes`.
    pub fn with_capacity(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes: Some(capacity_bytes),
            ..Self::default()
        }
    }

    /// When set, every mutation fails with `StoreError::Unavailable`.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Bytes currently charged against capacity.
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|(key, value)| entry_size(key, value))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::Unavailable("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_writable()?;
        if let Some(capacity_bytes) = self.capacity_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |previous| entry_size(key, previous));
            let required_bytes = self.used_bytes() - replaced + entry_size(key, value);
            if required_bytes > capacity_bytes {
                return Err(StoreError::QuotaExceeded {
                    required_bytes,
                    capacity_bytes,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.ensure_writable()?;
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
