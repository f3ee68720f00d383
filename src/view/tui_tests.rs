//! Tests for the interactive front end, driven key by key with a TestBackend.

use super::*;
use crate::config::{Options, DEFAULT_TYPING_THRESHOLD};
use crate::model::{ItemList, ItemSpec};
use ratatui::backend::TestBackend;

fn fruit_app() -> TuiApp<TestBackend> {
    app_with(Options::default())
}

fn app_with(options: Options) -> TuiApp<TestBackend> {
    let ItemList {
        mut document,
        container,
    } = ItemList::build(&[
        ItemSpec::new("Apple"),
        ItemSpec::new("Banana"),
        ItemSpec::new("apricot"),
    ])
    .unwrap();
    let controller = Searchify::bind(&mut document, container, options).unwrap();
    let terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
    TuiApp::new_for_test(terminal, document, controller)
}

fn numbered_app(count: usize) -> TuiApp<TestBackend> {
    let items: Vec<ItemSpec> = (1..=count)
        .map(|i| ItemSpec::new(format!("item {:02}", i)))
        .collect();
    let ItemList {
        mut document,
        container,
    } = ItemList::build(&items).unwrap();
    let controller = Searchify::bind(&mut document, container, Options::default()).unwrap();
    let terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
    TuiApp::new_for_test(terminal, document, controller)
}

fn row(app: &TuiApp<TestBackend>, y: u16) -> String {
    let buffer = app.terminal().backend().buffer();
    (0..buffer.area().width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn type_text(app: &mut TuiApp<TestBackend>, text: &str, now: Instant) {
    for ch in text.chars() {
        assert!(!app.handle_key(key(KeyCode::Char(ch)), now));
    }
}

fn buffer_to_string(app: &TuiApp<TestBackend>) -> String {
    let buffer = app.terminal().backend().buffer();
    let area = buffer.area();
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ===== Debounced typing =====

#[test]
fn typing_searches_after_threshold() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "apr", now);
    assert_eq!(app.controller().query(), "");
    assert!(!app.tick(now), "trigger must not fire before the threshold");

    assert!(app.tick(now + DEFAULT_TYPING_THRESHOLD));
    assert_eq!(app.controller().query(), "apr");
    assert_eq!(app.controller().match_count(), 1);
}

#[test]
fn short_query_does_not_search() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ap", now);
    app.tick(now + DEFAULT_TYPING_THRESHOLD);

    assert_eq!(app.controller().query(), "");
    assert_eq!(app.controller().match_count(), 3);
    assert_eq!(app.input.text(), "ap");
}

#[test]
fn enter_submits_regardless_of_length() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ap", now);
    app.handle_key(key(KeyCode::Enter), now);

    assert_eq!(app.controller().query(), "ap");
    assert_eq!(app.controller().match_count(), 2);
    assert!(!app.debounce.is_pending());
}

#[test]
fn backspace_to_empty_resets() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ban", now);
    app.tick(now + DEFAULT_TYPING_THRESHOLD);
    assert_eq!(app.controller().match_count(), 1);

    for _ in 0..3 {
        app.handle_key(key(KeyCode::Backspace), now);
    }
    app.tick(now + DEFAULT_TYPING_THRESHOLD);

    assert_eq!(app.controller().query(), "");
    assert_eq!(app.controller().match_count(), 3);
}

#[test]
fn cursor_keys_do_not_schedule_search() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ap", now);
    app.handle_key(key(KeyCode::Enter), now);
    app.handle_key(key(KeyCode::Left), now);
    app.handle_key(key(KeyCode::Home), now);

    assert!(!app.debounce.is_pending());
    assert_eq!(app.input.cursor(), 0);
}

// ===== Control keys =====

#[test]
fn ctrl_c_quits() {
    let mut app = fruit_app();
    assert!(app.handle_key(ctrl('c'), Instant::now()));
}

#[test]
fn esc_clears_then_quits() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ban", now);
    app.handle_key(key(KeyCode::Enter), now);
    assert_eq!(app.controller().match_count(), 1);

    assert!(!app.handle_key(key(KeyCode::Esc), now));
    assert!(app.input.is_empty());
    assert_eq!(app.controller().match_count(), 3);

    assert!(app.handle_key(key(KeyCode::Esc), now));
}

#[test]
fn ctrl_r_reloads_items() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ban", now);
    app.handle_key(key(KeyCode::Enter), now);
    app.handle_key(ctrl('r'), now);

    assert_eq!(app.status.as_deref(), Some("Reloaded 3 items"));
    assert!(app.input.is_empty());
    assert_eq!(app.controller().query(), "");
    assert_eq!(app.controller().match_count(), 3);
}

#[test]
fn ctrl_d_dismisses_alert() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "xyz", now);
    app.handle_key(key(KeyCode::Enter), now);
    assert!(app.controller().no_results_alert().is_some());

    app.handle_key(ctrl('d'), now);
    assert!(app.controller().no_results_alert().is_none());
    assert_eq!(app.controller().query(), "xyz");
}

#[test]
fn invalid_pattern_sets_status_and_keeps_results() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ban", now);
    app.handle_key(key(KeyCode::Enter), now);

    app.handle_key(key(KeyCode::Backspace), now);
    app.handle_key(key(KeyCode::Backspace), now);
    app.handle_key(key(KeyCode::Backspace), now);
    type_text(&mut app, "(", now);
    app.handle_key(key(KeyCode::Enter), now);

    let status = app.status.clone().unwrap();
    assert!(status.contains("Invalid search pattern"), "{status}");
    assert_eq!(app.controller().query(), "ban");
    assert_eq!(app.controller().match_count(), 1);
    assert_eq!(app.input.text(), "(");
}

#[test]
fn successful_search_clears_status() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "(", now);
    app.handle_key(key(KeyCode::Enter), now);
    assert!(app.status.is_some());

    app.handle_key(key(KeyCode::Backspace), now);
    type_text(&mut app, "apple", now);
    app.handle_key(key(KeyCode::Enter), now);

    assert!(app.status.is_none());
    assert_eq!(app.controller().match_count(), 1);
}

// ===== Rendering =====

#[test]
fn draw_shows_count_and_items() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "ap", now);
    app.handle_key(key(KeyCode::Enter), now);
    app.draw().unwrap();

    let screen = buffer_to_string(&app);
    assert!(screen.contains("Search:"));
    assert!(screen.contains("2 of 3"));
    assert!(screen.contains("Apple"));
    assert!(screen.contains("apricot"));
    assert!(!screen.contains("Banana"));
}

#[test]
fn draw_shows_no_results_alert() {
    let mut app = fruit_app();
    let now = Instant::now();

    type_text(&mut app, "xyz", now);
    app.handle_key(key(KeyCode::Enter), now);
    app.draw().unwrap();

    let alert = app.controller().no_results_alert().unwrap();
    assert_eq!(app.document().text_content(alert), "No results for \"xyz\"");

    let screen = buffer_to_string(&app);
    assert!(screen.contains("0 of 3"));
    assert!(screen.contains("No results for \"xyz\""));
}

#[test]
fn draw_uses_configured_label() {
    let mut app = app_with(Options::default().label(Some("Find fruit")));
    app.draw().unwrap();

    assert!(buffer_to_string(&app).contains("Find fruit"));
}

#[test]
fn arrow_and_page_keys_scroll_results() {
    let mut app = numbered_app(30);
    let now = Instant::now();

    // results interior is rows 4..=11
    app.draw().unwrap();
    assert!(row(&app, 4).contains("item 01"));

    app.handle_key(key(KeyCode::Down), now);
    app.handle_key(key(KeyCode::Down), now);
    app.draw().unwrap();
    assert_eq!(app.scroll, 2);
    assert!(row(&app, 4).contains("item 03"));

    app.handle_key(key(KeyCode::PageDown), now);
    app.draw().unwrap();
    assert!(row(&app, 4).contains("item 13"));

    app.handle_key(key(KeyCode::Up), now);
    app.draw().unwrap();
    assert!(row(&app, 4).contains("item 12"));
}

#[test]
fn scroll_is_clamped_to_matches() {
    let mut app = numbered_app(30);
    let now = Instant::now();

    for _ in 0..5 {
        app.handle_key(key(KeyCode::PageDown), now);
    }
    assert_eq!(app.scroll, 29);
    app.draw().unwrap();
    assert!(row(&app, 4).contains("item 23"));
    assert!(row(&app, 11).contains("item 30"));

    for _ in 0..5 {
        app.handle_key(key(KeyCode::PageUp), now);
    }
    assert_eq!(app.scroll, 0);
}

#[test]
fn new_search_scrolls_back_to_top() {
    let mut app = numbered_app(30);
    let now = Instant::now();

    app.handle_key(key(KeyCode::PageDown), now);
    assert_eq!(app.scroll, 10);

    type_text(&mut app, "item 2", now);
    app.handle_key(key(KeyCode::Enter), now);
    app.draw().unwrap();

    assert_eq!(app.scroll, 0);
    assert_eq!(app.controller().match_count(), 10);
    assert!(row(&app, 4).contains("item 20"));
}

#[test]
fn into_parts_returns_final_state() {
    let mut app = fruit_app();
    let now = Instant::now();
    type_text(&mut app, "ban", now);
    app.handle_key(key(KeyCode::Enter), now);

    let (document, controller) = app.into_parts();
    assert_eq!(controller.match_count(), 1);
    assert_eq!(document.text_content(controller.matches()[0]), "Banana");
}

#[test]
fn io_errors_convert() {
    let err = TuiError::from(io::Error::other("gone"));
    assert!(matches!(err, TuiError::Io(_)));
    assert_eq!(err.to_string(), "Terminal IO error: gone");
}
