//! Tests for the debounced input binding.

use super::*;

const DELAY: Duration = Duration::from_millis(350);

fn binding() -> DebouncedInput {
    DebouncedInput::new(DELAY, 3)
}

#[test]
fn nothing_fires_before_delay() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("app", start);

    assert_eq!(input.poll(start + Duration::from_millis(349), ""), None);
    assert!(input.is_pending());
}

#[test]
fn fires_search_after_delay() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("app", start);

    assert_eq!(
        input.poll(start + DELAY, ""),
        Some(InputAction::Search("app".to_string()))
    );
    assert!(!input.is_pending(), "trigger is single-shot");
    assert_eq!(input.poll(start + DELAY * 2, ""), None);
}

#[test]
fn new_key_up_replaces_pending_trigger() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("app", start);
    input.key_up("appl", start + Duration::from_millis(200));

    // original deadline passed, rescheduled one has not
    assert_eq!(input.poll(start + DELAY, ""), None);
    assert_eq!(
        input.poll(start + Duration::from_millis(550), ""),
        Some(InputAction::Search("appl".to_string()))
    );
}

#[test]
fn key_down_cancels_pending_trigger() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("app", start);
    input.key_down();

    assert_eq!(input.next_deadline(), None);
    assert_eq!(input.poll(start + DELAY, ""), None);
}

#[test]
fn value_equal_to_last_query_does_nothing() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("apple", start);

    assert_eq!(input.poll(start + DELAY, "apple"), None);
}

#[test]
fn short_value_does_nothing() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("ap", start);

    assert_eq!(input.poll(start + DELAY, "apple"), None);
}

#[test]
fn empty_value_resets_regardless_of_minimum() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("", start);

    assert_eq!(input.poll(start + DELAY, "apple"), Some(InputAction::Reset));
}

#[test]
fn empty_value_with_empty_last_query_does_nothing() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("", start);

    assert_eq!(input.poll(start + DELAY, ""), None);
}

#[test]
fn minimum_counts_characters_not_bytes() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("éé", start);

    assert_eq!(input.poll(start + DELAY, ""), None);
}

#[test]
fn submit_searches_immediately_and_cancels() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("a", start);

    assert_eq!(input.submit("a"), InputAction::Search("a".to_string()));
    assert!(!input.is_pending());
}

#[test]
fn next_deadline_reports_due_time() {
    let start = Instant::now();
    let mut input = binding();
    input.key_up("app", start);

    assert_eq!(input.next_deadline(), Some(start + DELAY));
}

#[test]
fn from_options_uses_threshold_and_min_chars() {
    let options = Options::default().min_chars(1);
    let input = DebouncedInput::from_options(&options);

    assert_eq!(input.delay(), Duration::from_millis(350));
    assert_eq!(input.min_chars(), 1);
}
