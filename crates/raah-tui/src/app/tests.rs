use std::sync::Arc;

use raah_core::mock::{book, edition, echo_payload};
use raah_core::{CompareRequest, Notification, Operation, SelectionState, Step};

use super::*;
use crate::action::Action;

/// Create a minimal App for testing (no orchestrator, no terminal).
fn test_app() -> App {
    App::new(Theme::hacker())
}

/// An App wired to a channel so tests can see which intents it sends.
fn wired_app() -> (App, mpsc::UnboundedReceiver<Intent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = test_app();
    app.intent_tx = Some(tx);
    (app, rx)
}

fn sent(rx: &mut mpsc::UnboundedReceiver<Intent>) -> Vec<Intent> {
    let mut intents = Vec::new();
    while let Ok(intent) = rx.try_recv() {
        intents.push(intent);
    }
    intents
}

fn selection(editions: &[&str], book: Option<&str>, chapter: u32) -> SelectionState {
    SelectionState {
        edition_ids: editions.iter().map(|s| s.to_string()).collect(),
        book_id: book.map(String::from),
        chapter,
    }
}

/// Feed the notifications a completed startup would produce.
fn loaded(app: &mut App) {
    app.handle_notification(Notification::EditionsChanged(vec![
        edition("kjv", "KJV", "English"),
        edition("niv", "NIV", "English"),
        edition("esv", "ESV", "English"),
        edition("yor", "YOR", "Yoruba"),
        edition("hau", "HAU", "Hausa"),
    ]));
    app.handle_notification(Notification::BooksChanged {
        books: vec![
            book("GEN", "Genesis", Some(50)),
            book("EXO", "Exodus", Some(40)),
            book("OBA", "Obadiah", Some(1)),
        ],
        source_edition: "kjv".into(),
    });
    app.handle_notification(Notification::SelectionChanged(selection(
        &["kjv", "niv"],
        Some("GEN"),
        1,
    )));
}

// ── Notifications ──────────────────────────────────────────────

#[test]
fn notifications_update_the_model() {
    let mut app = test_app();
    loaded(&mut app);
    assert_eq!(app.viewer.editions.len(), 5);
    assert_eq!(app.viewer.books_source.as_deref(), Some("kjv"));
    assert_eq!(app.viewer.selection.count_label(), "2 versions selected");
    assert_eq!(app.viewer.position_label(), "Genesis 1 of 50");

    app.handle_notification(Notification::LoadingChanged(true));
    assert!(app.viewer.loading);
    app.handle_notification(Notification::LoadingChanged(false));
    assert!(!app.viewer.loading);
}

#[test]
fn error_is_shown_until_cleared() {
    let mut app = test_app();
    app.handle_notification(Notification::ErrorRaised {
        operation: Operation::LoadEditions,
        message: "Failed to load Bible versions: network error: refused".into(),
    });
    assert!(app.viewer.error.as_deref().unwrap().starts_with("Failed"));
    app.handle_notification(Notification::ErrorCleared);
    assert_eq!(app.viewer.error, None);
}

#[test]
fn book_cursor_follows_selected_book() {
    let mut app = test_app();
    loaded(&mut app);
    assert_eq!(app.book_cursor, 0);
    app.handle_notification(Notification::SelectionChanged(selection(
        &["kjv"],
        Some("OBA"),
        1,
    )));
    assert_eq!(app.book_cursor, 2);
}

#[test]
fn new_comparison_resets_scroll() {
    let mut app = test_app();
    loaded(&mut app);
    let payload = Arc::new(echo_payload(&CompareRequest {
        version_ids: vec!["kjv".into(), "niv".into()],
        book_id: "GEN".into(),
        chapter: 1,
    }));
    app.handle_notification(Notification::ComparisonChanged(Some(payload.clone())));
    app.focus = Pane::Comparison;
    app.update(Action::MoveDown);
    app.update(Action::MoveDown);
    assert_eq!(app.comparison_scroll, 2);

    // Same payload again keeps the position.
    app.handle_notification(Notification::ComparisonChanged(Some(payload)));
    assert_eq!(app.comparison_scroll, 2);

    app.handle_notification(Notification::ComparisonChanged(None));
    assert_eq!(app.comparison_scroll, 0);
    assert!(app.viewer.comparison.is_none());
}

// ── Editions pane ──────────────────────────────────────────────

#[test]
fn select_toggles_edition_under_cursor() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::MoveDown);
    app.update(Action::MoveDown);
    app.update(Action::Select);
    assert_eq!(sent(&mut rx), [Intent::ToggleEdition("esv".into())]);
}

#[test]
fn fifth_edition_is_refused_locally() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.handle_notification(Notification::SelectionChanged(selection(
        &["kjv", "niv", "esv", "yor"],
        Some("GEN"),
        1,
    )));
    app.update(Action::GoBottom);
    assert_eq!(app.edition_cursor, 4);
    app.update(Action::Select);
    assert!(sent(&mut rx).is_empty());
    assert!(app.status.as_deref().unwrap().starts_with("At most 4 versions"));

    // Deselecting is still allowed at the cap.
    app.update(Action::GoTop);
    app.update(Action::Select);
    assert_eq!(sent(&mut rx), [Intent::ToggleEdition("kjv".into())]);
    assert_eq!(app.status, None);
}

#[test]
fn cursor_stays_in_bounds() {
    let mut app = test_app();
    app.update(Action::MoveDown);
    assert_eq!(app.edition_cursor, 0);
    loaded(&mut app);
    app.update(Action::PageDown);
    assert_eq!(app.edition_cursor, 4);
    app.update(Action::MoveUp);
    assert_eq!(app.edition_cursor, 3);
    app.update(Action::PageUp);
    assert_eq!(app.edition_cursor, 0);
}

// ── Books and chapters ─────────────────────────────────────────

#[test]
fn select_in_books_pane_changes_book() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::FocusNext);
    assert_eq!(app.focus, Pane::Books);
    app.update(Action::MoveDown);
    app.update(Action::Select);
    assert_eq!(sent(&mut rx), [Intent::ChangeBook("EXO".into())]);
}

#[test]
fn focus_cycles_both_ways() {
    let mut app = test_app();
    app.update(Action::FocusPrev);
    assert_eq!(app.focus, Pane::Comparison);
    app.update(Action::FocusNext);
    assert_eq!(app.focus, Pane::Editions);
}

#[test]
fn chapter_steps_respect_bounds() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);

    app.update(Action::PrevChapter);
    assert!(sent(&mut rx).is_empty());
    assert_eq!(app.status.as_deref(), Some("Already at the first chapter"));

    app.update(Action::NextChapter);
    assert_eq!(sent(&mut rx), [Intent::StepChapter(Step::Next)]);

    app.handle_notification(Notification::SelectionChanged(selection(
        &["kjv"],
        Some("OBA"),
        1,
    )));
    app.update(Action::NextChapter);
    assert!(sent(&mut rx).is_empty());
    assert_eq!(app.status.as_deref(), Some("Already at the last chapter"));
}

#[test]
fn chapter_input_sends_valid_number() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::StartChapterInput);
    assert_eq!(app.input_mode, InputMode::Chapter);
    app.update(Action::ChapterInput('1'));
    app.update(Action::ChapterInput('9'));
    app.update(Action::ChapterBackspace);
    app.update(Action::ChapterInput('2'));
    app.update(Action::ChapterConfirm);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(sent(&mut rx), [Intent::ChangeChapter(12)]);
}

#[test]
fn chapter_input_out_of_range_is_refused() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::StartChapterInput);
    for c in ['5', '1'] {
        app.update(Action::ChapterInput(c));
    }
    app.update(Action::ChapterConfirm);
    assert!(sent(&mut rx).is_empty());
    assert_eq!(app.status.as_deref(), Some("Chapter must be between 1 and 50"));
}

#[test]
fn chapter_input_needs_a_book() {
    let mut app = test_app();
    app.update(Action::StartChapterInput);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status.as_deref(), Some("Pick a book first"));
}

#[test]
fn chapter_input_cancel() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::StartChapterInput);
    app.update(Action::ChapterInput('3'));
    app.update(Action::ChapterCancel);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.chapter_input.is_empty());
    assert!(sent(&mut rx).is_empty());
}

// ── Global ─────────────────────────────────────────────────────

#[test]
fn retry_sends_intent() {
    let (mut app, mut rx) = wired_app();
    app.update(Action::Retry);
    assert_eq!(sent(&mut rx), [Intent::Retry]);
}

#[test]
fn help_overlay_swallows_keys() {
    let (mut app, mut rx) = wired_app();
    loaded(&mut app);
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::Select);
    app.update(Action::NextChapter);
    assert!(sent(&mut rx).is_empty());
    app.update(Action::ChapterCancel);
    assert!(!app.show_help);
}

#[test]
fn quit_sets_flag() {
    let mut app = test_app();
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn tick_advances_without_clearing_status() {
    let mut app = test_app();
    app.status = Some("hint".into());
    app.update(Action::Tick);
    assert_eq!(app.tick, 1);
    assert_eq!(app.status.as_deref(), Some("hint"));
}
