//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod layout;
mod results;
mod search_input;

pub use layout::{render_layout, Screen};
pub use results::ResultsList;
pub use search_input::SearchBar;

use crate::model::{Document, SearchifyError};
use crate::state::input_handler::{
    clear_input, handle_backspace, handle_char_input, handle_cursor_left, handle_cursor_right,
    handle_delete, handle_end, handle_home,
};
use crate::state::{DebouncedInput, InputAction, InputBuffer, Searchify};
use constants::{IDLE_POLL_MS, PAGE_SCROLL_LINES};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Interactive filter over one bound container.
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    document: Document,
    controller: Searchify,
    debounce: DebouncedInput,
    input: InputBuffer,
    /// First result row shown.
    scroll: usize,
    status: Option<String>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Set up the terminal in raw mode with alternate screen.
    ///
    /// `controller` must already be initialized on `document`.
    pub fn new(document: Document, controller: Searchify) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, document, controller))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits (Ctrl+C, or Esc on an empty query).
    /// Sleeps in `event::poll` until a key arrives or the debounce deadline passes.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self
                .debounce
                .next_deadline()
                .map(|due| due.saturating_duration_since(Instant::now()))
                .unwrap_or(Duration::from_millis(IDLE_POLL_MS));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key, Instant::now()) {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => {}
                    _ => continue,
                }
            } else if !self.tick(Instant::now()) {
                continue;
            }

            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(terminal: Terminal<B>, document: Document, controller: Searchify) -> Self {
        let debounce = DebouncedInput::from_options(controller.options());
        let input = InputBuffer::new(controller.query());
        Self {
            terminal,
            document,
            controller,
            debounce,
            input,
            scroll: 0,
            status: None,
        }
    }

    /// Handle one key press. Returns true if the app should quit.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('r') if ctrl => self.reload(),
            KeyCode::Char('d') if ctrl => {
                let outcome = self.controller.dismiss_no_results(&mut self.document).map(|_| ());
                if let Err(err) = outcome {
                    self.report(err);
                }
            }
            KeyCode::Enter => {
                let action = self.debounce.submit(self.input.text());
                self.execute(action);
            }
            KeyCode::Esc => {
                if self.input.is_empty() {
                    return true;
                }
                self.debounce.key_down();
                self.update_buffer(clear_input);
                self.execute(InputAction::Reset);
            }
            KeyCode::Backspace => self.edit(handle_backspace, now),
            KeyCode::Delete => self.edit(handle_delete, now),
            KeyCode::Left => self.update_buffer(handle_cursor_left),
            KeyCode::Right => self.update_buffer(handle_cursor_right),
            KeyCode::Home => self.update_buffer(handle_home),
            KeyCode::End => self.update_buffer(handle_end),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE_SCROLL_LINES as isize)),
            KeyCode::PageDown => self.scroll_by(PAGE_SCROLL_LINES as isize),
            KeyCode::Char(ch) if !ctrl => self.edit(|buffer| handle_char_input(buffer, ch), now),
            _ => {}
        }
        false
    }

    /// A text edit is a key-down (cancel) followed by a key-up (reschedule).
    fn edit(&mut self, apply: impl FnOnce(InputBuffer) -> InputBuffer, now: Instant) {
        self.debounce.key_down();
        self.input = apply(std::mem::take(&mut self.input));
        self.debounce.key_up(self.input.text(), now);
    }

    /// Change the buffer without scheduling a search.
    fn update_buffer(&mut self, apply: impl FnOnce(InputBuffer) -> InputBuffer) {
        self.input = apply(std::mem::take(&mut self.input));
    }

    /// Move the results view, staying within the match list.
    fn scroll_by(&mut self, delta: isize) {
        let last = self.controller.matches().len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(last);
    }

    /// Fire the debounced trigger if due. Returns true if anything ran.
    fn tick(&mut self, now: Instant) -> bool {
        let last_query = self.controller.query().to_string();
        match self.debounce.poll(now, &last_query) {
            Some(action) => {
                self.execute(action);
                true
            }
            None => false,
        }
    }

    fn execute(&mut self, action: InputAction) {
        debug!(action = ?action, "executing input action");
        let outcome = self.controller.apply(&mut self.document, action).map(|_| ());
        match outcome {
            Ok(()) => {
                self.status = None;
                self.scroll = 0;
            }
            Err(err) => self.report(err),
        }
    }

    fn reload(&mut self) {
        self.debounce.key_down();
        let outcome = self
            .controller
            .reload(&mut self.document)
            .map(|ctl| ctl.items().len());
        match outcome {
            Ok(count) => {
                self.status = Some(format!("Reloaded {} items", count));
                self.input = InputBuffer::default();
                self.scroll = 0;
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: SearchifyError) {
        match &err {
            SearchifyError::Pattern(_) => warn!(error = %err, "search pattern rejected"),
            _ => warn!(error = %err, "operation failed"),
        }
        self.status = Some(err.to_string());
    }

    /// Snapshot everything a frame shows.
    fn screen(&self) -> Screen {
        let options = self.controller.options();
        Screen {
            label: options.label.clone(),
            location: options.search_location.clone(),
            input: self.input.clone(),
            results: self
                .controller
                .matches()
                .iter()
                .map(|id| (options.item_text)(&self.document, *id))
                .collect(),
            alert: self
                .controller
                .no_results_alert()
                .map(|id| self.document.text_content(id)),
            scroll: self.scroll,
            matched: self.controller.match_count(),
            total: self.controller.items().len(),
            status: self.status.clone(),
        }
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let screen = self.screen();
        self.terminal.draw(|frame| render_layout(frame, &screen))?;
        Ok(())
    }

    /// Give the document and controller back, e.g. to print the final state.
    pub fn into_parts(self) -> (Document, Searchify) {
        (self.document, self.controller)
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp without terminal initialization (test-only constructor)
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        document: Document,
        controller: Searchify,
    ) -> Self {
        Self::with_terminal(terminal, document, controller)
    }

    pub(crate) fn controller(&self) -> &Searchify {
        &self.controller
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI, restoring the terminal afterwards.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_controller(
    document: Document,
    controller: Searchify,
) -> Result<(Document, Searchify), TuiError> {
    let mut app = TuiApp::new(document, controller)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    restore_terminal()?;

    result.map(|()| app.into_parts())
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
