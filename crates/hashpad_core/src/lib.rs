//! Core of hashpad: fragment-addressed plain-text notes in a local
//! key-value store.
//!
//! The storage layer (`repo`) persists and evicts notes over an explicit
//! store handle (`store`); the controller (`controller`) maps the URL fragment
//! to the active note and orchestrates saves with eviction-and-retry.

pub mod config;
pub mod controller;
pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod routing;
pub mod service;
pub mod store;

pub use config::{ConfigError, HashpadConfig};
pub use controller::{ControllerState, NoteController, NoteView, RecordingView, ViewEvent};
pub use id::generate_note_id;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, StoredNote, Timestamp};
pub use presentation::{NoteRow, NoteStats};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SavePolicy};
pub use routing::{parse_location, LocationHost, MemoryLocation, NoteLocation};
pub use service::note_service::{NoteService, SaveFailure, SaveOutcome};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Builds a repository over `store` using the configured prefix and policy.
pub fn repository_from_config<S: KeyValueStore>(
    store: S,
    config: &HashpadConfig,
) -> NoteRepository<S> {
    NoteRepository::new(store)
        .with_prefix(config.key_prefix.clone())
        .with_policy(config.save_policy)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, repository_from_config, HashpadConfig, MemoryStore, SavePolicy};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn repository_follows_config() {
        let config = HashpadConfig {
            key_prefix: "p_".to_string(),
            save_policy: SavePolicy::AllowBlank,
            ..HashpadConfig::default()
        };
        let repo = repository_from_config(MemoryStore::new(), &config);
        assert_eq!(repo.prefix(), "p_");
        assert_eq!(repo.policy(), SavePolicy::AllowBlank);
    }
}
