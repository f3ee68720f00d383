//! Debounced input binding.
//!
//! A trailing, single-shot, cancellable trigger. Every key-up replaces the
//! pending trigger, so at most one is pending. The caller owns the clock:
//! events carry `now`, and the event loop calls [`DebouncedInput::poll`]
//! when [`DebouncedInput::next_deadline`] passes.
//!
//! When a trigger fires:
//! - value equal to the last executed query: nothing
//! - value of at least `min_chars` characters: search
//! - empty value: reset
//! - otherwise nothing, the last result set stays displayed

use crate::config::Options;
use std::time::{Duration, Instant};

/// What the controller should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Run a search for this query.
    Search(String),
    /// Clear the query and show every item.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    value: String,
    due: Instant,
}

/// Typing-threshold debounce in front of a controller.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    delay: Duration,
    min_chars: usize,
    pending: Option<Pending>,
}

impl DebouncedInput {
    /// Debouncer firing `delay` after the last key-up.
    pub fn new(delay: Duration, min_chars: usize) -> Self {
        Self {
            delay,
            min_chars,
            pending: None,
        }
    }

    /// Use the typing threshold and minimum length from controller options.
    pub fn from_options(options: &Options) -> Self {
        Self::new(options.typing_threshold, options.min_chars)
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Shortest value that searches rather than doing nothing.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Key released: cancel any pending trigger and schedule a new one.
    pub fn key_up(&mut self, value: &str, now: Instant) {
        self.pending = Some(Pending {
            value: value.to_string(),
            due: now + self.delay,
        });
    }

    /// Key pressed: cancel the pending trigger.
    pub fn key_down(&mut self) {
        self.pending = None;
    }

    /// True while a trigger is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending trigger is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Fire the trigger if it is due.
    ///
    /// `last_query` is the query the controller last executed.
    pub fn poll(&mut self, now: Instant, last_query: &str) -> Option<InputAction> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        let pending = self.pending.take()?;
        self.decide(&pending.value, last_query)
    }

    /// Explicit submit (the form's search event): search now, whatever the length.
    pub fn submit(&mut self, value: &str) -> InputAction {
        self.pending = None;
        InputAction::Search(value.to_string())
    }

    fn decide(&self, value: &str, last_query: &str) -> Option<InputAction> {
        if value == last_query {
            None
        } else if value.chars().count() >= self.min_chars {
            Some(InputAction::Search(value.to_string()))
        } else if value.is_empty() {
            Some(InputAction::Reset)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
