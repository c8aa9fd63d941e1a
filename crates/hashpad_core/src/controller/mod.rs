//! Application controller: note identity, routing and save orchestration.
//!
//! # Responsibility
//! - Resolve the active note id from the location, coining one when absent.
//! - Drive load/save against `NoteService` in response to host events.
//! - Push title, stats, indicator and listing updates to the `NoteView`.
//!
//! # Invariants
//! - Host events never observe an error; failures become view updates.
//! - A failed save leaves the edit in the view untouched.
//! - Fragment changes to the active id are no-ops.

mod view;

pub use view::{NoteView, RecordingView, ViewEvent};

use crate::id::{generate_note_id, DEFAULT_ID_LENGTH};
use crate::presentation::{
    derive_title, note_rows, NoteStats, SAVED_MESSAGE, SAVE_FAILED_MESSAGE,
};
use crate::routing::LocationHost;
use crate::service::note_service::{NoteService, SaveFailure, SaveOutcome};
use crate::store::KeyValueStore;
use log::{debug, error, info};

/// Lifecycle of the active note identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Not started; no id resolved.
    NoId,
    /// Resolving an id and loading its content.
    Routing,
    /// An id is active and the view reflects it.
    Editing,
}

/// Top-level orchestrator wiring a store, a view and an address bar.
pub struct NoteController<S, V, L>
where
    S: KeyValueStore,
    V: NoteView,
    L: LocationHost,
{
    service: NoteService<S>,
    view: V,
    location: L,
    note_id: Option<String>,
    state: ControllerState,
    id_length: usize,
    notes_table_visible: bool,
}

impl<S, V, L> NoteController<S, V, L>
where
    S: KeyValueStore,
    V: NoteView,
    L: LocationHost,
{
    pub fn new(service: NoteService<S>, view: V, location: L) -> Self {
        Self {
            service,
            view,
            location,
            note_id: None,
            state: ControllerState::NoId,
            id_length: DEFAULT_ID_LENGTH,
            notes_table_visible: false,
        }
    }

    /// Length used when a new id must be generated.
    pub fn with_id_length(mut self, id_length: usize) -> Self {
        self.id_length = id_length;
        self
    }

    /// Resolves the note id and loads the initial content.
    ///
    /// A `note` query parameter wins over stored content: it is adopted,
    /// saved, the cursor moves to its end and the query is stripped.
    /// Calling `start` again is a no-op.
    pub fn start(&mut self) -> &str {
        if self.state == ControllerState::NoId {
            self.state = ControllerState::Routing;
            let id = self.resolve_note_id();
            self.view.set_note_id(&id);
            self.note_id = Some(id);
            self.load_initial_note();
            self.state = ControllerState::Editing;
        }
        self.note_id.as_deref().unwrap_or_default()
    }

    /// Content-change event: title, save, then stats and indicator.
    pub fn handle_input(&mut self) -> SaveOutcome {
        let text = self.view.text();
        self.view.set_title(&derive_title(&text));
        let outcome = self.save_current(&text);
        match &outcome {
            SaveOutcome::Saved { .. } => {
                self.view.set_stats(NoteStats::from_text(&text));
                self.view.show_indicator(SAVED_MESSAGE);
            }
            SaveOutcome::SkippedBlank => {
                self.view.set_stats(NoteStats::from_text(&text));
            }
            SaveOutcome::Failed { .. } => {}
        }
        outcome
    }

    /// Window teardown: one last save of the current text.
    pub fn handle_teardown(&mut self) -> SaveOutcome {
        let text = self.view.text();
        self.save_current(&text)
    }

    /// Fragment-change event. Returns whether the active note switched.
    pub fn handle_fragment_change(&mut self) -> bool {
        let location = self.location.location();
        let Some(next_id) = location.note_id() else {
            return false;
        };
        if self.note_id.as_deref() == Some(next_id) {
            return false;
        }

        self.state = ControllerState::Routing;
        info!("event=note_switch module=controller status=start id={next_id}");
        let content = self.load_content(next_id).unwrap_or_default();
        self.note_id = Some(next_id.to_string());
        self.view.set_note_id(next_id);
        self.view.set_text(&content);
        self.refresh_title_and_stats(&content);
        self.close_notes_table();
        self.state = ControllerState::Editing;
        true
    }

    /// Opens the listing of every stored note, newest first.
    ///
    /// Returns the number of rows shown.
    pub fn show_all_notes(&mut self) -> usize {
        let notes = match self.service.list_notes() {
            Ok(notes) => notes,
            Err(err) => {
                error!("event=notes_list module=controller status=error error={err}");
                Vec::new()
            }
        };
        let rows = note_rows(&notes);
        self.view.show_notes_table(&rows);
        self.notes_table_visible = true;
        rows.len()
    }

    pub fn close_notes_table(&mut self) {
        if self.notes_table_visible {
            self.view.hide_notes_table();
            self.notes_table_visible = false;
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn is_notes_table_visible(&self) -> bool {
        self.notes_table_visible
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn service(&self) -> &NoteService<S> {
        &self.service
    }

    pub fn into_parts(self) -> (NoteService<S>, V, L) {
        (self.service, self.view, self.location)
    }

    fn resolve_note_id(&mut self) -> String {
        if let Some(id) = self.location.location().note_id() {
            debug!("event=note_route module=controller status=ok source=fragment id={id}");
            return id.to_string();
        }
        let id = generate_note_id(self.id_length);
        self.location.publish_fragment(&id);
        info!("event=note_route module=controller status=ok source=generated id={id}");
        id
    }

    fn load_initial_note(&mut self) {
        let location = self.location.location();
        if let Some(seed) = location.seed_content() {
            self.view.set_text(&seed);
            self.save_current(&seed);
            self.view.move_cursor_to_end();
            self.location.replace(location.without_query());
            self.refresh_title_and_stats(&seed);
            return;
        }

        let Some(id) = self.note_id.clone() else {
            return;
        };
        let text = match self.load_content(&id) {
            Some(content) => {
                self.view.set_text(&content);
                content
            }
            None => self.view.text(),
        };
        self.refresh_title_and_stats(&text);
    }

    /// Stored content for `id`; backend failures read as "no note".
    fn load_content(&self, id: &str) -> Option<String> {
        match self.service.load(id) {
            Ok(note) => note.map(|note| note.content),
            Err(err) => {
                error!("event=note_load module=controller status=error id={id} error={err}");
                None
            }
        }
    }

    fn save_current(&mut self, text: &str) -> SaveOutcome {
        let Some(id) = self.note_id.clone() else {
            error!("event=note_save module=controller status=error error_code=no_active_note");
            self.view.show_indicator(SAVE_FAILED_MESSAGE);
            return SaveOutcome::Failed {
                reason: SaveFailure::NoActiveNote,
                evicted: Vec::new(),
            };
        };
        let outcome = self.service.save_with_eviction(&id, text);
        if outcome.is_failed() {
            self.view.show_indicator(SAVE_FAILED_MESSAGE);
        }
        outcome
    }

    fn refresh_title_and_stats(&mut self, text: &str) {
        self.view.set_title(&derive_title(text));
        self.view.set_stats(NoteStats::from_text(text));
    }
}
