use hashpad_core::{
    parse_location, ControllerState, KeyValueStore, LocationHost, MemoryLocation, MemoryStore,
    NoteController, NoteRepository, NoteService, NoteStats, RecordingView, SaveFailure,
    SaveOutcome, ViewEvent,
};

type TestController = NoteController<MemoryStore, RecordingView, MemoryLocation>;

fn controller_at(store: MemoryStore, url: &str) -> TestController {
    let location = MemoryLocation::new(parse_location(url).unwrap());
    let service = NoteService::new(NoteRepository::new(store));
    NoteController::new(service, RecordingView::new(), location)
}

fn store_with(notes: &[(&str, &str, i64)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (id, content, timestamp) in notes {
        store
            .set(
                &format!("note_{id}"),
                &format!(r#"{{"content":"{content}","timestamp":{timestamp}}}"#),
            )
            .unwrap();
    }
    store
}

#[test]
fn start_without_fragment_coins_and_publishes_an_id() {
    let mut controller = controller_at(MemoryStore::new(), "https://pad.example/");
    assert_eq!(controller.state(), ControllerState::NoId);

    let id = controller.start().to_string();
    assert_eq!(id.len(), 5);
    assert_eq!(controller.state(), ControllerState::Editing);
    assert_eq!(controller.location().location().note_id(), Some(id.as_str()));
    assert_eq!(controller.view().note_id, id);
    assert_eq!(controller.view().title, "New Note");
    assert_eq!(
        controller.view().stats,
        NoteStats {
            lines: 1,
            words: 0,
            chars: 0
        }
    );
}

#[test]
fn start_with_fragment_loads_stored_content() {
    let store = store_with(&[("abc", "Shopping\\nmilk eggs", 10)]);
    let mut controller = controller_at(store, "https://pad.example/#abc");

    assert_eq!(controller.start(), "abc");
    assert_eq!(controller.view().text, "Shopping\nmilk eggs");
    assert_eq!(controller.view().title, "Shopping");
    assert_eq!(controller.view().stats.words, 3);
    assert!(controller.location().history().is_empty());
}

#[test]
fn seed_query_overrides_stored_note_and_is_stripped() {
    let store = store_with(&[("n1", "old text", 10)]);
    let mut controller = controller_at(store, "https://pad.example/app?note=fresh%20text#n1");

    controller.start();
    let view = controller.view();
    assert_eq!(view.text, "fresh text");
    assert_eq!(view.cursor, "fresh text".len());
    assert!(view.events.contains(&ViewEvent::CursorToEnd));
    assert_eq!(
        controller.location().location().url().as_str(),
        "https://pad.example/app#n1"
    );
    assert_eq!(
        controller.service().load("n1").unwrap().unwrap().content,
        "fresh text"
    );
}

#[test]
fn input_saves_and_updates_affordances() {
    let mut controller = controller_at(MemoryStore::new(), "#n1");
    controller.start();
    controller.view_mut().clear_events();

    controller.view_mut().type_text("Hello\nbig world");
    let outcome = controller.handle_input();

    assert!(outcome.is_saved());
    let view = controller.view();
    assert_eq!(view.title, "Hello");
    assert_eq!(view.stats.to_string(), "lines: 2, words: 3, chars: 15");
    assert_eq!(view.indicators(), vec!["Saved."]);
    assert_eq!(
        controller.service().load("n1").unwrap().unwrap().content,
        "Hello\nbig world"
    );
}

#[test]
fn blank_input_is_not_persisted_and_shows_no_indicator() {
    let store = store_with(&[("n1", "keep", 10)]);
    let mut controller = controller_at(store, "#n1");
    controller.start();
    controller.view_mut().clear_events();

    controller.view_mut().type_text("   ");
    assert_eq!(controller.handle_input(), SaveOutcome::SkippedBlank);
    assert!(controller.view().indicators().is_empty());
    assert_eq!(controller.view().title, "   ");
    assert_eq!(controller.service().load("n1").unwrap().unwrap().content, "keep");
}

#[test]
fn failed_save_keeps_edit_and_shows_failure() {
    let mut store = store_with(&[("n1", "before", 10)]);
    store.set_read_only(true);
    let mut controller = controller_at(store, "#n1");
    controller.start();

    controller.view_mut().type_text("after");
    let outcome = controller.handle_input();

    assert!(matches!(
        outcome,
        SaveOutcome::Failed {
            reason: SaveFailure::Store(_),
            ..
        }
    ));
    assert_eq!(controller.view().text, "after");
    assert_eq!(controller.view().indicators(), vec!["Save failed!"]);
    assert_eq!(controller.service().load("n1").unwrap().unwrap().content, "before");
}

#[test]
fn input_on_full_store_evicts_other_notes() {
    let mut store = MemoryStore::with_capacity(100);
    store
        .set("note_old", r#"{"content":"aaaa","timestamp":1}"#)
        .unwrap();
    store
        .set("note_new", r#"{"content":"bbbb","timestamp":2}"#)
        .unwrap();
    let mut controller = controller_at(store, "#cur");
    controller.start();

    controller.view_mut().type_text("cccc");
    assert_eq!(
        controller.handle_input(),
        SaveOutcome::Saved {
            evicted: vec!["old".to_string()]
        }
    );
    assert_eq!(controller.view().indicators(), vec!["Saved."]);
}

#[test]
fn fragment_change_switches_note_and_hides_listing() {
    let store = store_with(&[("a", "alpha", 10), ("b", "beta body", 20)]);
    let mut controller = controller_at(store, "#a");
    controller.start();
    controller.show_all_notes();
    assert!(controller.is_notes_table_visible());

    controller.location_mut().navigate_to_fragment("b");
    assert!(controller.handle_fragment_change());

    assert_eq!(controller.note_id(), Some("b"));
    assert_eq!(controller.state(), ControllerState::Editing);
    let view = controller.view();
    assert_eq!(view.note_id, "b");
    assert_eq!(view.text, "beta body");
    assert_eq!(view.title, "beta body");
    assert!(view.table.is_none());
    assert!(!controller.is_notes_table_visible());
}

#[test]
fn fragment_change_to_same_or_empty_id_is_a_noop() {
    let store = store_with(&[("a", "alpha", 10)]);
    let mut controller = controller_at(store, "#a");
    controller.start();
    controller.view_mut().clear_events();

    controller.location_mut().navigate_to_fragment("a");
    assert!(!controller.handle_fragment_change());
    controller.location_mut().navigate_to_fragment("");
    assert!(!controller.handle_fragment_change());
    assert!(controller.view().events.is_empty());
    assert_eq!(controller.note_id(), Some("a"));
}

#[test]
fn fragment_change_to_unknown_id_shows_empty_note() {
    let store = store_with(&[("a", "alpha", 10)]);
    let mut controller = controller_at(store, "#a");
    controller.start();

    controller.location_mut().navigate_to_fragment("zz");
    assert!(controller.handle_fragment_change());
    assert_eq!(controller.view().text, "");
    assert_eq!(controller.view().title, "New Note");
}

#[test]
fn listing_shows_rows_newest_first() {
    let long = "x".repeat(120);
    let store = store_with(&[
        ("a", "one\\ntwo", 1_700_000_000_000),
        ("b", long.as_str(), 1_700_000_100_000),
    ]);
    let mut controller = controller_at(store, "#a");
    controller.start();

    assert_eq!(controller.show_all_notes(), 2);
    let rows = controller.view().table.clone().unwrap();
    assert_eq!(rows[0].id, "b");
    assert_eq!(rows[0].href, "#b");
    assert!(rows[0].preview.ends_with("..."));
    assert_eq!(rows[1].preview, "one two");
    assert_eq!(rows[1].updated, "2023-11-14 22:13:20");

    controller.close_notes_table();
    assert!(controller.view().table.is_none());
}

#[test]
fn teardown_saves_current_text() {
    let mut controller = controller_at(MemoryStore::new(), "#t1");
    controller.start();
    controller.view_mut().type_text("draft");

    assert!(controller.handle_teardown().is_saved());
    assert_eq!(controller.service().load("t1").unwrap().unwrap().content, "draft");
}

#[test]
fn input_before_start_reports_missing_note() {
    let mut controller = controller_at(MemoryStore::new(), "#t1");
    controller.view_mut().type_text("early");

    assert_eq!(
        controller.handle_input(),
        SaveOutcome::Failed {
            reason: SaveFailure::NoActiveNote,
            evicted: Vec::new(),
        }
    );
    assert_eq!(controller.view().indicators(), vec!["Save failed!"]);
}
