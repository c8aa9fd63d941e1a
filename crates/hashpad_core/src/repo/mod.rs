//! Note persistence on top of a key-value store handle.
//!
//! # Responsibility
//! - Map note ids to store keys under a configurable prefix.
//! - Own save/load/enumerate/evict semantics for notes.
//!
//! # Invariants
//! - Repository APIs never touch keys outside the configured prefix.
//! - Malformed stored values are recovered, never surfaced as errors.

pub mod note_repo;
