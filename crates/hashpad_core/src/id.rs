//! Short note identifiers.
//!
//! Ids are random and not checked against existing keys; two sessions can
//! coin the same id. That collision risk is accepted.

use uuid::Uuid;

pub const DEFAULT_ID_LENGTH: usize = 5;
pub const MAX_ID_LENGTH: usize = 32;

/// Returns the first `len` hex chars of a random v4 UUID.
///
/// `len` is clamped to `1..=32`.
pub fn generate_note_id(len: usize) -> String {
    let len = len.clamp(1, MAX_ID_LENGTH);
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}

#[cfg(test)]
mod tests {
    use super::{generate_note_id, DEFAULT_ID_LENGTH};

    #[test]
    fn default_ids_are_short_lowercase_hex() {
        let id = generate_note_id(DEFAULT_ID_LENGTH);
        assert_eq!(id.len(), 5);
        assert!(id.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
    }

    #[test]
    fn length_is_clamped() {
        assert_eq!(generate_note_id(0).len(), 1);
        assert_eq!(generate_note_id(99).len(), 32);
    }
}
