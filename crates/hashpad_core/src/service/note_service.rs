//! Note save-with-eviction use-case.
//!
//! # Responsibility
//! - Save the current note, freeing space by evicting older notes when the
//!   store reports capacity exhaustion.
//! - Report every result as a `SaveOutcome`; nothing is raised to callers.
//!
//! # Invariants
//! - Eviction only runs on capacity exhaustion and never targets the note
//!   being saved.
//! - Each retry follows exactly one successful eviction, so the loop is
//!   bounded by the number of other stored notes.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use crate::store::KeyValueStore;
use log::{error, info, warn};

/// Why a save could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFailure {
    /// Store is full and no other note is left to evict.
    QuotaExhausted,
    /// Non-capacity failure (invalid id, backend error).
    Store(String),
    /// No note id has been resolved yet.
    NoActiveNote,
}

/// Result of one save attempt, including any evictions it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content written; `evicted` lists ids removed to make room, oldest first.
    Saved { evicted: Vec<String> },
    /// Blank content was not written.
    SkippedBlank,
    /// Nothing more can be done automatically; the edit stays in memory only.
    Failed {
        reason: SaveFailure,
        evicted: Vec<String>,
    },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Note service facade over the repository.
pub struct NoteService<S: KeyValueStore> {
    repo: NoteRepository<S>,
}

impl<S: KeyValueStore> NoteService<S> {
    pub fn new(repo: NoteRepository<S>) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &NoteRepository<S> {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut NoteRepository<S> {
        &mut self.repo
    }

    pub fn into_repo(self) -> NoteRepository<S> {
        self.repo
    }

    /// Saves `content` under `id`, evicting the oldest other note and
    /// retrying each time the store is full.
    pub fn save_with_eviction(&mut self, id: &str, content: &str) -> SaveOutcome {
        let mut evicted = Vec::new();
        loop {
            match self.repo.save(id, content) {
                Ok(true) => {
                    if !evicted.is_empty() {
                        info!(
                            "event=note_save module=service status=ok id={} evicted={}",
                            id,
                            evicted.len()
                        );
                    }
                    return SaveOutcome::Saved { evicted };
                }
                Ok(false) => return SaveOutcome::SkippedBlank,
                Err(err) if err.is_quota_exceeded() => {
                    warn!("event=note_save module=service status=quota_exceeded id={id}");
                    match self.repo.remove_oldest_note_id(id) {
                        Ok(Some(removed)) => evicted.push(removed),
                        Ok(None) => {
                            error!(
                                "event=note_save module=service status=error id={id} error_code=quota_exhausted"
                            );
                            return SaveOutcome::Failed {
                                reason: SaveFailure::QuotaExhausted,
                                evicted,
                            };
                        }
                        Err(evict_err) => return Self::failed(id, &evict_err, evicted),
                    }
                }
                Err(err) => return Self::failed(id, &err, evicted),
            }
        }
    }

    /// Loads one note by id.
    pub fn load(&self, id: &str) -> RepoResult<Option<Note>> {
        self.repo.load(id)
    }

    /// Lists every note, newest first.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.get_all_notes()
    }

    fn failed(id: &str, err: &RepoError, evicted: Vec<String>) -> SaveOutcome {
        error!(
            "event=note_save module=service status=error id={} error_code=store_failed error={}",
            id, err
        );
        SaveOutcome::Failed {
            reason: SaveFailure::Store(err.to_string()),
            evicted,
        }
    }
}
