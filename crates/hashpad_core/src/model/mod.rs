//! Domain model for persisted notes.
//!
//! # Invariants
//! - A note is identified by its short opaque `id`; one stored record per id.
//! - `timestamp` is the last successful write, never the creation time.

pub mod note;
