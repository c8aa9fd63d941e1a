//! UI surface driven by the controller.

use crate::presentation::{NoteRow, NoteStats};

/// Editable surface plus the status widgets around it.
pub trait NoteView {
    /// Current content of the editable surface.
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn move_cursor_to_end(&mut self);
    fn set_note_id(&mut self, id: &str);
    fn set_title(&mut self, title: &str);
    fn set_stats(&mut self, stats: NoteStats);
    /// Shows a transient status message (`Saved.`, `Save failed!`).
    fn show_indicator(&mut self, message: &str);
    fn show_notes_table(&mut self, rows: &[NoteRow]);
    fn hide_notes_table(&mut self);
}

/// One observable view update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Text(String),
    CursorToEnd,
    NoteId(String),
    Title(String),
    Stats(NoteStats),
    Indicator(String),
    NotesTable(Vec<NoteRow>),
    NotesTableHidden,
}

/// Headless view that keeps the current state and a log of updates.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub text: String,
    pub cursor: usize,
    pub note_id: String,
    pub title: String,
    pub stats: NoteStats,
    pub table: Option<Vec<NoteRow>>,
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates typing: replaces the surface content without an event.
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Indicator messages shown so far, oldest first.
    pub fn indicators(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Indicator(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl NoteView for RecordingView {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = 0;
        self.events.push(ViewEvent::Text(self.text.clone()));
    }

    fn move_cursor_to_end(&mut self) {
        self.cursor = self.text.chars().count();
        self.events.push(ViewEvent::CursorToEnd);
    }

    fn set_note_id(&mut self, id: &str) {
        self.note_id = id.to_string();
        self.events.push(ViewEvent::NoteId(self.note_id.clone()));
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.events.push(ViewEvent::Title(self.title.clone()));
    }

    fn set_stats(&mut self, stats: NoteStats) {
        self.stats = stats;
        self.events.push(ViewEvent::Stats(stats));
    }

    fn show_indicator(&mut self, message: &str) {
        self.events.push(ViewEvent::Indicator(message.to_string()));
    }

    fn show_notes_table(&mut self, rows: &[NoteRow]) {
        self.table = Some(rows.to_vec());
        self.events.push(ViewEvent::NotesTable(rows.to_vec()));
    }

    fn hide_notes_table(&mut self) {
        self.table = None;
        self.events.push(ViewEvent::NotesTableHidden);
    }
}
