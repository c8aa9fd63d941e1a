//! Note domain model and its stored record shape.
//!
//! # Responsibility
//! - Define the in-memory `Note` handed to callers.
//! - Own the JSON wire record and the legacy bare-string fallback.
//!
//! # Invariants
//! - Decoding a present value never fails; undecodable input is legacy content.
//! - Legacy content always carries `timestamp = 0`.

use serde::{Deserialize, Serialize};

/// Epoch milliseconds of the last successful save.
pub type Timestamp = i64;

/// One persisted note as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Short identifier, also used as URL fragment.
    pub id: String,
    /// Full note text, may be empty for legacy records.
    pub content: String,
    /// Last-write instant in epoch milliseconds (`0` for legacy records).
    pub timestamp: Timestamp,
}

/// Serialized record stored under `<prefix><id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub content: String,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl StoredNote {
    pub fn new(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            content: content.into(),
            timestamp,
        }
    }

    /// Encodes the record as compact JSON.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a raw stored value.
    ///
    /// Values that are not a JSON object with a string `content` are treated as
    /// pre-migration bare strings.
    pub fn decode(raw: &str) -> Self {
        Self::try_decode(raw).unwrap_or_else(|| Self::legacy(raw))
    }

    /// Decodes a structured record, `None` for anything else.
    pub fn try_decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<StoredNote>(raw).ok()
    }

    /// Wraps a bare-string value from the pre-JSON format.
    pub fn legacy(raw: &str) -> Self {
        Self::new(raw, 0)
    }

    pub fn into_note(self, id: impl Into<String>) -> Note {
        Note {
            id: id.into(),
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// Returns whether content would be rejected as blank.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_blank, StoredNote};

    #[test]
    fn decode_reads_structured_record() {
        let record = StoredNote::decode(r#"{"content":"hello","timestamp":1700000000000}"#);
        assert_eq!(record, StoredNote::new("hello", 1_700_000_000_000));
    }

    #[test]
    fn decode_falls_back_to_legacy_for_plain_text() {
        assert_eq!(
            StoredNote::decode("just some text"),
            StoredNote::new("just some text", 0)
        );
    }

    #[test]
    fn decode_treats_wrong_json_shapes_as_legacy() {
        assert_eq!(StoredNote::decode("42"), StoredNote::new("42", 0));
        assert_eq!(
            StoredNote::decode(r#"{"body":"x"}"#),
            StoredNote::new(r#"{"body":"x"}"#, 0)
        );
        assert_eq!(StoredNote::decode("{broken"), StoredNote::new("{broken", 0));
    }

    #[test]
    fn missing_timestamp_defaults_to_epoch() {
        assert_eq!(
            StoredNote::decode(r#"{"content":"old"}"#),
            StoredNote::new("old", 0)
        );
    }

    #[test]
    fn encode_uses_content_and_timestamp_fields() {
        let encoded = StoredNote::new("a\nb", 5).encode().unwrap();
        assert_eq!(encoded, r#"{"content":"a\nb","timestamp":5}"#);
    }

    #[test]
    fn whitespace_only_content_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t "));
        assert!(!is_blank(" x "));
    }
}
