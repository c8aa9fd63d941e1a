//! Note repository over a `KeyValueStore`.
//!
//! # Responsibility
//! - Persist notes as JSON records under `<prefix><id>`.
//! - Enumerate notes newest-first and evict the oldest non-current note.
//!
//! # Invariants
//! - At most one record per id; `save` is a single full-overwrite put.
//! - Under `SavePolicy::RejectBlank`, blank content never creates or
//!   overwrites a record.
//! - Written timestamps never go backwards for a given id.
//! - Eviction never removes the note passed as current.

use crate::model::note::{is_blank, Note, StoredNote, Timestamp};
use crate::store::{KeyValueStore, StoreError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store key prefix shared by every note record.
pub const DEFAULT_KEY_PREFIX: &str = "note_";

pub type RepoResult<T> = Result<T, RepoError>;

/// Millisecond clock used to stamp saves.
pub type Clock = Box<dyn Fn() -> Timestamp>;

/// Blank-content handling for `save`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Blank or whitespace-only content is not written; `save` returns `false`.
    #[default]
    RejectBlank,
    /// Legacy behavior: every save is written, even empty content.
    AllowBlank,
}

/// Repository error for note persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Note ids must be non-empty.
    InvalidId,
    /// Underlying store failure, including capacity exhaustion.
    Store(StoreError),
}

impl RepoError {
    /// Whether the failure is the recoverable capacity condition.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_quota_exceeded())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId => write!(f, "note id cannot be empty"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Returns wall-clock epoch milliseconds.
pub fn system_now_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Note persistence over an explicit store handle.
pub struct NoteRepository<S: KeyValueStore> {
    store: S,
    prefix: String,
    policy: SavePolicy,
    clock: Clock,
}

impl<S: KeyValueStore> NoteRepository<S> {
    /// Creates a repository with the default prefix, policy and system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            policy: SavePolicy::default(),
            clock: Box::new(system_now_ms),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_policy(mut self, policy: SavePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the save clock, used by tests to pin timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Persists `content` under `id` with a fresh timestamp.
    ///
    /// Returns `Ok(false)` without writing when the policy rejects blank content.
    ///
    /// # Errors
    /// - `RepoError::InvalidId` for an empty id.
    /// - `RepoError::Store` when the put fails; capacity exhaustion is
    ///   reported as `StoreError::QuotaExceeded` and left to the caller.
    pub fn save(&mut self, id: &str, content: &str) -> RepoResult<bool> {
        if id.is_empty() {
            return Err(RepoError::InvalidId);
        }
        if self.policy == SavePolicy::RejectBlank && is_blank(content) {
            debug!("event=note_save module=repo status=skip reason=blank id={id}");
            return Ok(false);
        }

        let key = self.key_for(id);
        let previous = self.read_record(&key)?.map_or(0, |record| record.timestamp);
        let record = StoredNote::new(content, (self.clock)().max(previous));
        let encoded = record
            .encode()
            .map_err(|err| StoreError::Unavailable(format!("failed to encode note: {err}")))?;

        self.store.set(&key, &encoded)?;
        debug!(
            "event=note_save module=repo status=ok id={} bytes={} timestamp={}",
            id,
            encoded.len(),
            record.timestamp
        );
        Ok(true)
    }

    /// Loads one note, recovering legacy bare-string values.
    ///
    /// Returns `Ok(None)` when no (non-empty) value is stored under `id`.
    pub fn load(&self, id: &str) -> RepoResult<Option<Note>> {
        let key = self.key_for(id);
        Ok(self.read_record(&key)?.map(|record| record.into_note(id)))
    }

    /// Lists every note, newest first.
    ///
    /// Equal timestamps keep store enumeration order.
    pub fn get_all_notes(&self) -> RepoResult<Vec<Note>> {
        let keys = self.store.keys_with_prefix(&self.prefix)?;
        let mut notes = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(id) = key.strip_prefix(self.prefix.as_str()) else {
                continue;
            };
            if let Some(record) = self.read_record(&key)? {
                notes.push(record.into_note(id));
            }
        }
        notes.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        Ok(notes)
    }

    /// Deletes the least recently written note other than `current_id`.
    ///
    /// Returns `false` when no other note exists.
    pub fn remove_oldest_note(&mut self, current_id: &str) -> RepoResult<bool> {
        Ok(self.remove_oldest_note_id(current_id)?.is_some())
    }

    /// Same as `remove_oldest_note`, returning the evicted id.
    pub fn remove_oldest_note_id(&mut self, current_id: &str) -> RepoResult<Option<String>> {
        let notes = self.get_all_notes()?;
        // `min_by_key` keeps the first minimum, matching a stable ascending sort.
        let Some(oldest) = notes
            .into_iter()
            .filter(|note| note.id != current_id)
            .min_by_key(|note| note.timestamp)
        else {
            info!("event=note_evict module=repo status=skip reason=no_candidate");
            return Ok(None);
        };

        self.store.remove(&self.key_for(&oldest.id))?;
        info!(
            "event=note_evict module=repo status=ok id={} timestamp={}",
            oldest.id, oldest.timestamp
        );
        Ok(Some(oldest.id))
    }

    fn key_for(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    fn read_record(&self, key: &str) -> RepoResult<Option<StoredNote>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(StoredNote::try_decode(&raw).unwrap_or_else(|| {
            warn!("event=note_decode module=repo status=legacy key={key}");
            StoredNote::legacy(&raw)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteRepository, RepoError, SavePolicy};
    use crate::store::{KeyValueStore, MemoryStore};
    use std::cell::Cell;
    use std::rc::Rc;

    fn stepping_clock(start: i64) -> impl Fn() -> i64 {
        let next = Rc::new(Cell::new(start));
        move || {
            let now = next.get();
            next.set(now + 100);
            now
        }
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut repo = NoteRepository::new(MemoryStore::new());
        assert!(matches!(repo.save("", "text"), Err(RepoError::InvalidId)));
    }

    #[test]
    fn allow_blank_policy_overwrites_with_empty_content() {
        let mut repo = NoteRepository::new(MemoryStore::new())
            .with_policy(SavePolicy::AllowBlank)
            .with_clock(stepping_clock(10));
        assert!(repo.save("a1", "hello").unwrap());
        assert!(repo.save("a1", "").unwrap());
        assert_eq!(repo.load("a1").unwrap().unwrap().content, "");
    }

    #[test]
    fn backwards_clock_does_not_reorder_a_note() {
        let mut repo = NoteRepository::new(MemoryStore::new()).with_clock(|| 50);
        repo.store_mut()
            .set("note_a", r#"{"content":"x","timestamp":900}"#)
            .unwrap();

        repo.save("a", "y").unwrap();
        assert_eq!(repo.load("a").unwrap().unwrap().timestamp, 900);
    }

    #[test]
    fn empty_stored_value_reads_as_missing() {
        let mut store = MemoryStore::new();
        store.set("note_e", "").unwrap();
        let repo = NoteRepository::new(store);
        assert_eq!(repo.load("e").unwrap(), None);
        assert!(repo.get_all_notes().unwrap().is_empty());
    }

    #[test]
    fn custom_prefix_isolates_namespaces() {
        let mut store = MemoryStore::new();
        store.set("note_a", "default namespace").unwrap();
        let mut repo = NoteRepository::new(store).with_prefix("pad:");
        repo.save("a", "scoped").unwrap();

        let ids: Vec<String> = repo
            .get_all_notes()
            .unwrap()
            .into_iter()
            .map(|note| note.id)
            .collect();
        assert_eq!(ids, vec!["a".to_string()]);
        assert_eq!(repo.load("a").unwrap().unwrap().content, "scoped");
    }
}
