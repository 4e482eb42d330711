//! End-to-end find & replace against a plain `Editor` host.

use std::time::Duration;

use quire_editor_core::node::build::*;
use quire_editor_core::{Document, Editor, EditorHost, Origin, Selection, Transaction, UndoManager};
use quire_editor_search::replace::still_matches;
use quire_editor_search::{SearchConfig, SearchPanel, SearchSession};
use tracing_subscriber::EnvFilter;
use web_time::Instant;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn editor(paragraphs: &[&str]) -> Editor {
    init_tracing();
    Editor::new(Document::from_paragraphs(paragraphs))
}

fn search(editor: &Editor, term: &str) -> SearchSession {
    let mut session = SearchSession::new(SearchConfig::default());
    session.set_search_term(editor, term);
    session
}

/// Apply a user edit and let the session follow it, like a host plugin would.
fn user_edit(editor: &mut Editor, session: &mut SearchSession, tr: Transaction) {
    let mapping = editor.dispatch(tr).unwrap();
    session.handle_transaction(&mapping, Origin::User, editor.document());
}

#[test]
fn test_whole_word_round_trip() {
    let editor = editor(&["The quick brown fox. The fox jumps."]);
    let mut session = SearchSession::new(SearchConfig::default());
    session.set_whole_word(&editor, true);
    session.set_search_term(&editor, "fox");

    assert_eq!(session.results().len(), 2);
    assert_eq!(session.current_index(), Some(0));
    insta::assert_snapshot!(
        session.decorations().to_string(),
        @"[17..20 current-match] [26..29 match]"
    );
}

#[test]
fn test_cursor_wraps_both_ways() {
    let mut editor = editor(&["cat", "cat", "cat"]);
    let mut session = search(&editor, "cat");

    session.find_next(&mut editor);
    session.find_next(&mut editor);
    assert_eq!(session.current_index(), Some(2));
    session.find_next(&mut editor);
    assert_eq!(session.current_index(), Some(0));
    session.find_previous(&mut editor);
    assert_eq!(session.current_index(), Some(2));
}

#[test]
fn test_navigation_sets_selection_once_per_step() {
    let mut editor = editor(&["cat cat cat"]);
    let mut session = search(&editor, "cat");
    assert_eq!(editor.dispatch_count(), 0);

    assert!(session.find_next(&mut editor));
    assert_eq!(editor.dispatch_count(), 1);
    assert_eq!(editor.selection(), Selection::new(5, 8));
    assert_eq!(editor.scroll_target(), Some(Selection::new(5, 8)));

    assert!(session.find_previous(&mut editor));
    assert_eq!(editor.dispatch_count(), 2);
    assert_eq!(editor.selection(), Selection::new(1, 4));

    // Selection changes never enter the undo history.
    assert!(!editor.can_undo());
}

#[test]
fn test_replace_all_is_position_safe() {
    let mut editor = editor(&["foo foo foo"]);
    let mut session = search(&editor, "foo");
    session.set_replace_term("barbar");

    assert_eq!(session.replace_all(&mut editor), 3);
    assert_eq!(editor.document().text_content(), "barbar barbar barbar");
    assert!(session.results().is_empty());
    assert_eq!(session.current_index(), None);
    assert!(session.decorations().is_empty());
}

#[test]
fn test_replace_all_is_one_undo_step() {
    let mut editor = editor(&["foo foo", "foo"]);
    let mut session = search(&editor, "foo");
    session.set_replace_term("x");
    assert_eq!(session.replace_all(&mut editor), 3);
    assert_eq!(editor.history().undo_depth(), 1);

    assert!(editor.undo());
    assert_eq!(editor.document().text_content(), "foo foofoo");
    assert_eq!(
        editor.document().text_between(10, 13).as_deref(),
        Some("foo")
    );
    assert!(!editor.can_undo());
}

#[test]
fn test_replace_all_does_not_rescan_self_match() {
    let mut editor = editor(&["cat"]);
    let mut session = search(&editor, "cat");
    session.set_replace_term("concat");

    assert_eq!(session.replace_all(&mut editor), 1);
    assert_eq!(editor.document().text_content(), "concat");
    assert!(session.results().is_empty());
    assert_eq!(session.search_term(), "cat");

    session.update_find_results(&editor);
    assert_eq!(session.results().len(), 1);
}

#[test]
fn test_replace_current_isolation() {
    let mut editor = editor(&["cat cat cat"]);
    let mut session = search(&editor, "cat");
    session.find_next(&mut editor);
    assert_eq!(session.current_index(), Some(1));

    session.set_replace_term("dog");
    assert!(session.replace_current(&mut editor));
    assert_eq!(editor.document().text_content(), "cat dog cat");
    assert_eq!(session.results().len(), 2);
    assert_eq!(session.current_index(), Some(0));

    assert!(editor.undo());
    assert_eq!(editor.document().text_content(), "cat cat cat");
}

#[test]
fn test_replace_current_with_empty_deletes() {
    let mut editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");
    assert!(session.replace_current(&mut editor));
    assert_eq!(editor.document().text_content(), " cat");
    assert_eq!(session.results()[0].range(), 2..5);
}

#[test]
fn test_empty_term_clears() {
    let editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");
    assert_eq!(session.results().len(), 2);

    session.set_search_term(&editor, "");
    assert!(session.results().is_empty());
    assert_eq!(session.current_index(), None);
    assert!(session.decorations().is_empty());
}

#[test]
fn test_clear_is_idempotent() {
    let editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");

    session.clear_search();
    let once = (
        session.search_term().to_owned(),
        session.results().to_vec(),
        session.current_index(),
        session.decorations().clone(),
    );
    session.clear_search();
    let twice = (
        session.search_term().to_owned(),
        session.results().to_vec(),
        session.current_index(),
        session.decorations().clone(),
    );
    assert_eq!(once, twice);
    assert!(once.1.is_empty());
}

#[test]
fn test_foreign_insert_before_match_shifts_decorations() {
    let mut editor = editor(&["one fox two fox"]);
    let mut session = search(&editor, "fox");
    insta::assert_snapshot!(
        session.decorations().to_string(),
        @"[5..8 current-match] [13..16 match]"
    );

    user_edit(&mut editor, &mut session, Transaction::new().insert_text(1, "big "));
    insta::assert_snapshot!(
        session.decorations().to_string(),
        @"[9..12 current-match] [17..20 match]"
    );
    assert!(!session.is_stale());
}

#[test]
fn test_foreign_edit_inside_match_triggers_lazy_rescan() {
    let mut editor = editor(&["one fox two fox"]);
    let mut session = search(&editor, "fox");

    user_edit(&mut editor, &mut session, Transaction::new().insert_text(6, "x"));
    assert!(session.is_stale());
    insta::assert_snapshot!(session.decorations().to_string(), @"[14..17 current-match]");

    assert!(session.find_next(&mut editor));
    assert!(!session.is_stale());
    assert_eq!(session.results().len(), 1);
    assert_eq!(editor.selection(), Selection::new(14, 17));
}

#[test]
fn test_remap_is_linear_in_document_size() {
    let paragraphs = vec!["e e e e e"; 3000];
    let mut editor = editor(&paragraphs);
    let mut session = search(&editor, "e");
    assert_eq!(session.results().len(), 15000);

    let started = Instant::now();
    user_edit(&mut editor, &mut session, Transaction::new().insert_text(1, "x"));
    assert!(still_matches(editor.document(), session.results()));
    let elapsed = started.elapsed();

    assert_eq!(session.results().len(), 15000);
    assert!(!session.is_stale());
    assert_eq!(session.results()[0].range(), 2..3);
    // A per-match walk of the document takes tens of seconds here.
    assert!(elapsed < Duration::from_secs(2), "remap took {elapsed:?}");
}

#[test]
fn test_foreign_delete_of_match_drops_it() {
    let mut editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");

    user_edit(&mut editor, &mut session, Transaction::new().delete(5, 8));
    assert_eq!(session.results().len(), 1);
    assert!(session.is_stale());
}

#[test]
fn test_undo_after_replace_is_followed() {
    let mut editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");
    session.set_replace_term("dog");
    session.replace_current(&mut editor);
    assert_eq!(session.results().len(), 1);

    let tr = editor.undo_transaction().unwrap();
    user_edit(&mut editor, &mut session, tr);
    assert_eq!(editor.document().text_content(), "cat cat");

    session.update_find_results(&editor);
    assert_eq!(session.results().len(), 2);
}

#[test]
fn test_unreported_drift_rescans_before_replacing() {
    let mut editor = editor(&["cat cat"]);
    let mut session = search(&editor, "cat");

    // The host edits without telling the session.
    editor
        .dispatch(Transaction::new().insert_text(1, "x"))
        .unwrap();

    session.set_replace_term("dog");
    assert!(session.replace_current(&mut editor));
    assert_eq!(editor.document().text_content(), "xdog cat");
}

#[test]
fn test_unreported_drift_rescans_before_replace_all() {
    let mut editor = editor(&["foo foo"]);
    let mut session = search(&editor, "foo");
    editor
        .dispatch(Transaction::new().insert_text(1, "a"))
        .unwrap();

    session.set_replace_term("x");
    assert_eq!(session.replace_all(&mut editor), 2);
    assert_eq!(editor.document().text_content(), "ax x");
}

#[test]
fn test_matches_do_not_cross_marks() {
    init_tracing();
    let mut editor = Editor::new(Document::from_blocks(vec![paragraph(vec![
        text("ca"),
        bold("t"),
        text(" cat"),
    ])]));
    let mut session = search(&editor, "cat");
    assert_eq!(session.results().len(), 1);

    session.set_replace_term("dog");
    assert_eq!(session.replace_all(&mut editor), 1);
    assert_eq!(editor.document().text_content(), "cat dog");
}

#[test]
fn test_search_inside_nested_blocks() {
    init_tracing();
    let mut editor = Editor::new(Document::from_blocks(vec![
        blockquote(vec![paragraph(vec![text("a cat")])]),
        bullet_list(vec![list_item(vec![paragraph(vec![text("cat")])])]),
        table(vec![table_row(vec![table_cell(vec![paragraph(vec![
            text("cat"),
            hard_break(),
            text("cat"),
        ])])])]),
    ]));
    let mut session = search(&editor, "cat");
    assert_eq!(session.results().len(), 4);

    session.set_replace_term("dog");
    assert_eq!(session.replace_all(&mut editor), 4);
    assert!(!editor.document().text_content().contains("cat"));
}

#[test]
fn test_multibyte_replace_all() {
    let mut editor = editor(&["café ☕ café"]);
    let mut session = search(&editor, "CAFÉ");
    assert_eq!(session.results().len(), 2);
    assert_eq!(session.results()[1].range(), 8..12);

    session.set_replace_term("tea");
    assert_eq!(session.replace_all(&mut editor), 2);
    assert_eq!(editor.document().text_content(), "tea ☕ tea");
}

#[test]
fn test_panel_debounces_typing() {
    let mut editor = editor(&["cat catalog cab"]);
    let mut panel = SearchPanel::new(SearchConfig::default());
    panel.open();

    let start = Instant::now();
    panel.type_search_term("c", start);
    panel.type_search_term("ca", start + Duration::from_millis(3));
    panel.type_search_term("cat", start + Duration::from_millis(6));

    assert!(!panel.tick(&editor, start + Duration::from_millis(12)));
    assert_eq!(panel.view().label, "0 of 0");

    assert!(panel.tick(&editor, start + Duration::from_millis(16)));
    assert_eq!(panel.session().search_term(), "cat");
    assert_eq!(panel.view().label, "1 of 2");
    assert!(!panel.tick(&editor, start + Duration::from_millis(40)));

    panel.toggle_whole_word(&editor);
    assert_eq!(panel.view().label, "1 of 1");

    panel.set_replace_term("dog");
    assert_eq!(panel.replace_all(&mut editor), 1);
    assert_eq!(editor.document().text_content(), "dog catalog cab");
    let view = panel.view();
    assert_eq!(view.label, "0 of 0");
    assert!(!view.can_navigate);
    assert!(!view.can_replace);
}

#[test]
fn test_panel_config_from_json() {
    let editor = editor(&["Cat cat"]);
    let config =
        SearchConfig::from_json(r#"{ "case_sensitive": true, "debounce_ms": 50 }"#).unwrap();
    let mut panel = SearchPanel::new(config);

    let start = Instant::now();
    panel.type_search_term("cat", start);
    assert!(!panel.tick(&editor, start + Duration::from_millis(20)));
    assert!(panel.tick(&editor, start + Duration::from_millis(50)));
    assert_eq!(panel.view().total, 1);
}
