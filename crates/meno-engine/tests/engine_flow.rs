use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::executor::block_on;
use meno_core::{
    BlockType, RawBlock, RawContent, RawStyleRange, SelectionRange, StyleSet, StyleTag,
};
use meno_engine::{
    CommandMode, DispatchError, EditorTriggers, EngineConfig, ErrorReporter, InputOutcome,
    MenoEngine, PanelKey,
};

fn collecting_reporter() -> (ErrorReporter, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let reporter: ErrorReporter =
        Arc::new(move |error: &DispatchError| sink.lock().unwrap().push(error.to_string()));
    (reporter, log)
}

fn engine_with_reporter() -> (MenoEngine, Arc<Mutex<Vec<String>>>) {
    let (reporter, log) = collecting_reporter();
    (MenoEngine::new(EngineConfig::new().reporter(reporter)), log)
}

fn raw_doc(text: &str, ranges: Vec<RawStyleRange>) -> RawContent {
    RawContent {
        blocks: vec![RawBlock {
            key: "b0".to_string(),
            text: text.to_string(),
            block_type: BlockType::Unstyled,
            inline_style_ranges: ranges,
        }],
        entity_map: serde_json::Map::new(),
    }
}

fn panel_buffer(engine: &MenoEngine) -> &str {
    let CommandMode::Panel(panel) = engine.mode() else {
        panic!("expected open panel");
    };
    panel.buffer()
}

#[test]
fn typing_an_inline_command_and_submitting_applies_it() {
    let (mut engine, log) = engine_with_reporter();

    assert_eq!(engine.type_char('$'), InputOutcome::Handled);
    assert!(matches!(engine.mode(), CommandMode::Inline { .. }));
    engine.type_str("i:hello");

    assert_eq!(block_on(engine.handle_return()), InputOutcome::Handled);

    assert!(engine.mode().is_normal());
    let key = engine.state().selection().block_key.clone();
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.text(), "hello");
    assert_eq!(block.style_at(0), StyleSet::of(StyleTag::Italic));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn triggers_are_literal_while_a_command_is_being_composed() {
    let (mut engine, _log) = engine_with_reporter();

    assert_eq!(engine.type_char('$'), InputOutcome::Handled);
    // Both prompt characters are plain text now.
    assert_eq!(engine.type_char('$'), InputOutcome::NotHandled);
    assert_eq!(engine.type_char('#'), InputOutcome::NotHandled);
    assert!(!engine.panel_open());

    let key = engine.state().selection().block_key.clone();
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.text(), "$$#");
    assert_eq!(block.style_at(2), StyleSet::of(StyleTag::Command));
}

#[test]
fn submitting_a_bare_trigger_cancels_back_to_plain_text() {
    let (mut engine, log) = engine_with_reporter();

    engine.type_char('$');
    assert_eq!(block_on(engine.handle_return()), InputOutcome::Handled);

    assert!(engine.mode().is_normal());
    let key = engine.state().selection().block_key.clone();
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.text(), "$");
    assert_eq!(block.style_at(0), StyleSet::new());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn inline_failure_reports_and_leaves_the_command_text() {
    let (mut engine, log) = engine_with_reporter();

    engine.type_char('$');
    engine.type_char('i');
    let before = engine.state().content().to_plain_text();

    assert_eq!(block_on(engine.handle_return()), InputOutcome::Handled);

    assert!(engine.mode().is_normal());
    assert_eq!(engine.state().content().to_plain_text(), before);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["i: italic command need an argument".to_string()]
    );
}

#[test]
fn unstyled_caret_opens_the_panel_immediately() {
    let (mut engine, _log) = engine_with_reporter();

    assert_eq!(engine.type_char('#'), InputOutcome::Handled);
    assert!(engine.panel_open());
    assert!(!engine.panel_open_pending());
    assert_eq!(panel_buffer(&engine), "# ");
}

#[test]
fn panel_submit_changes_the_block_type() {
    let (mut engine, log) = engine_with_reporter();
    engine.type_char('#');

    for ch in "cb:q".chars() {
        assert_eq!(
            block_on(engine.handle_panel_key(PanelKey::Char(ch))),
            InputOutcome::Handled
        );
    }
    assert_eq!(panel_buffer(&engine), "# cb:q");
    block_on(engine.handle_panel_key(PanelKey::Enter));

    assert!(engine.mode().is_normal());
    let key = engine.state().selection().block_key.clone();
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.block_type, BlockType::Blockquote);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn failed_panel_command_keeps_the_panel_open() {
    let (mut engine, log) = engine_with_reporter();
    engine.type_char('#');

    for ch in "cb:zz".chars() {
        block_on(engine.handle_panel_key(PanelKey::Char(ch)));
    }
    block_on(engine.handle_panel_key(PanelKey::Enter));

    assert!(engine.panel_open());
    assert_eq!(panel_buffer(&engine), "# cb:zz");
    assert_eq!(
        *log.lock().unwrap(),
        vec!["cb: zz block doesn't exist.".to_string()]
    );
}

#[test]
fn escape_closes_the_panel_without_touching_content() {
    let (mut engine, _log) = engine_with_reporter();
    let before = engine.state().content().clone();

    engine.type_char('#');
    block_on(engine.handle_panel_key(PanelKey::Char('c')));
    block_on(engine.handle_panel_key(PanelKey::Escape));

    assert!(engine.mode().is_normal());
    assert_eq!(engine.state().content(), &before);

    // Cancelling again is a no-op.
    engine.cancel_panel();
    assert!(engine.mode().is_normal());
    assert_eq!(engine.state().content(), &before);
}

#[test]
fn backspacing_the_seed_away_exits_the_panel() {
    let (mut engine, _log) = engine_with_reporter();
    engine.type_char('#');

    block_on(engine.handle_panel_key(PanelKey::Char('x')));
    assert_eq!(
        block_on(engine.handle_panel_key(PanelKey::Backspace)),
        InputOutcome::Handled
    );
    assert!(engine.panel_open());

    // Only the seed is left; one more backspace exits.
    block_on(engine.handle_panel_key(PanelKey::Backspace));
    assert!(engine.mode().is_normal());
}

#[test]
fn selection_defers_the_panel_open_until_the_next_tick() {
    let config = EngineConfig::new().initial_content(raw_doc("hello", vec![]));
    let mut engine = MenoEngine::new(config);
    let key = engine.state().selection().block_key.clone();
    engine.set_selection(SelectionRange::new(key.clone(), 0, 5));

    assert_eq!(engine.handle_before_input('#'), InputOutcome::Handled);
    assert!(engine.panel_open_pending());
    assert!(!engine.panel_open());

    // No transitions while the deferred open is in flight.
    assert_eq!(engine.handle_before_input('#'), InputOutcome::NotHandled);
    assert_eq!(engine.handle_before_input('$'), InputOutcome::NotHandled);

    // The selected text is tagged as the pending command target.
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.style_at(2), StyleSet::of(StyleTag::Command));

    engine.tick();
    assert!(engine.panel_open());
    assert!(!engine.panel_open_pending());

    // The open is one-shot.
    engine.tick();
    assert!(engine.panel_open());
}

#[test]
fn highlight_command_rewrites_the_deferred_selection() {
    let config = EngineConfig::new().initial_content(raw_doc("hello", vec![]));
    let mut engine = MenoEngine::new(config);
    let key = engine.state().selection().block_key.clone();
    engine.set_selection(SelectionRange::new(key.clone(), 0, 5));

    engine.handle_before_input('#');
    engine.tick();
    block_on(engine.handle_panel_key(PanelKey::Char('h')));
    block_on(engine.handle_panel_key(PanelKey::Enter));

    assert!(engine.mode().is_normal());
    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.text(), "hello");
    assert_eq!(block.style_at(0), StyleSet::of(StyleTag::Important));
    assert_eq!(block.style_at(4), StyleSet::of(StyleTag::Important));
}

#[test]
fn styled_caret_widens_to_the_full_run_before_opening() {
    let config = EngineConfig::new().initial_content(raw_doc(
        "hello world",
        vec![RawStyleRange {
            offset: 0,
            length: 5,
            style: StyleTag::Italic,
        }],
    ));
    let mut engine = MenoEngine::new(config);
    let key = engine.state().selection().block_key.clone();
    engine.set_selection(SelectionRange::collapsed(key.clone(), 2));

    assert_eq!(engine.handle_before_input('#'), InputOutcome::Handled);
    assert!(engine.panel_open_pending());
    assert_eq!(
        (
            engine.state().selection().start(),
            engine.state().selection().end()
        ),
        (0, 5)
    );

    engine.tick();
    for ch in "cb:c".chars() {
        block_on(engine.handle_panel_key(PanelKey::Char(ch)));
    }
    block_on(engine.handle_panel_key(PanelKey::Enter));

    let block = engine.state().block(&key).unwrap();
    assert_eq!(block.block_type, BlockType::CodeBlock);
}

#[test]
fn return_clears_active_styles_outside_command_mode() {
    let config = EngineConfig::new().initial_content(raw_doc(
        "ab",
        vec![RawStyleRange {
            offset: 0,
            length: 2,
            style: StyleTag::Italic,
        }],
    ));
    let mut engine = MenoEngine::new(config);
    let key = engine.state().selection().block_key.clone();
    engine.set_selection(SelectionRange::collapsed(key, 2));

    assert_eq!(
        engine.state().current_style_set(),
        StyleSet::of(StyleTag::Italic)
    );
    assert_eq!(block_on(engine.handle_return()), InputOutcome::Handled);
    assert!(engine.state().current_style_set().is_empty());
}

#[test]
fn return_with_no_styles_falls_through_to_the_host() {
    let (mut engine, _log) = engine_with_reporter();
    engine.type_str("plain");
    assert_eq!(block_on(engine.handle_return()), InputOutcome::NotHandled);
}

#[test]
fn stale_results_are_discarded() {
    let (mut engine, _log) = engine_with_reporter();
    engine.type_str("ab");

    let token = engine.state().generation();
    let stale = engine.state().cleared();
    engine.type_char('c');

    assert!(!engine.install(token, stale));
    assert_eq!(engine.state().content().to_plain_text(), "abc");
}

#[test]
fn save_hook_runs_through_the_registered_command() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let triggers = EditorTriggers::new().on_save(move |raw| {
        let seen = seen.clone();
        async move {
            assert_eq!(raw.blocks[0].text, "notes");
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    let (reporter, log) = collecting_reporter();
    let config = EngineConfig::new()
        .initial_content(raw_doc("notes", vec![]))
        .triggers(triggers)
        .reporter(reporter);
    let mut engine = MenoEngine::new(config);

    block_on(engine.save());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(engine.state().content().to_plain_text(), "notes");
}

#[test]
fn save_without_a_hook_reports_through_the_sink() {
    let (mut engine, log) = engine_with_reporter();
    block_on(engine.save());
    assert_eq!(
        *log.lock().unwrap(),
        vec!["w: onSave is not defined.".to_string()]
    );
}

#[test]
fn clear_resets_content_and_mode() {
    let (mut engine, _log) = engine_with_reporter();
    engine.type_str("scratch");
    engine.type_char('#');
    assert!(engine.panel_open());

    engine.clear();
    assert!(engine.mode().is_normal());
    assert_eq!(engine.state().content().to_plain_text(), "");
}
