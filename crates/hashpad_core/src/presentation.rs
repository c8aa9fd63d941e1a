//! Display projections for the editing surface and the notes listing.
//!
//! # Responsibility
//! - Derive title, stats and previews from raw note text.
//! - Keep wording and truncation limits in one place for every host.

use crate::model::note::{Note, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;

pub const SAVED_MESSAGE: &str = "Saved.";
pub const SAVE_FAILED_MESSAGE: &str = "Save failed!";
pub const UNTITLED_NOTE: &str = "New Note";
/// How long the save indicator stays visible.
pub const INDICATOR_DURATION: Duration = Duration::from_millis(500);

const TITLE_MAX_CHARS: usize = 20;
const PREVIEW_MAX_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Live line/word/character counts for the editing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

impl NoteStats {
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        let words = if trimmed.is_empty() {
            0
        } else {
            WHITESPACE_RE.split(trimmed).count()
        };
        Self {
            lines: text.split('\n').count(),
            words,
            chars: text.chars().count(),
        }
    }
}

impl Display for NoteStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lines: {}, words: {}, chars: {}",
            self.lines, self.words, self.chars
        )
    }
}

/// One row of the all-notes listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: String,
    /// Fragment link target, `#<id>`.
    pub href: String,
    pub updated: String,
    pub preview: String,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            href: format!("#{}", note.id),
            updated: format_timestamp(note.timestamp),
            preview: content_preview(&note.content),
        }
    }
}

/// Document title: the first line capped at 20 chars, or `New Note`.
pub fn derive_title(text: &str) -> String {
    let first_line = text.split('\n').next().unwrap_or_default();
    let title: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    if title.is_empty() {
        UNTITLED_NOTE.to_string()
    } else {
        title
    }
}

/// Single-line preview: newlines collapsed, at most 100 chars plus `...`.
pub fn content_preview(content: &str) -> String {
    let flattened = content.replace('\n', " ");
    let mut preview: String = flattened.chars().take(PREVIEW_MAX_CHARS).collect();
    if content.chars().count() > PREVIEW_MAX_CHARS {
        preview.push_str(PREVIEW_ELLIPSIS);
    }
    preview
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Out-of-range values fall back to the raw millisecond count.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    let nanos = i128::from(timestamp) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|instant| {
            instant
                .format(format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second]"
                ))
                .ok()
        })
        .unwrap_or_else(|| timestamp.to_string())
}

/// Builds listing rows, preserving input order.
pub fn note_rows(notes: &[Note]) -> Vec<NoteRow> {
    notes.iter().map(NoteRow::from).collect()
}
