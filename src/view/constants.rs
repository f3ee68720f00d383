//! Layout dimension constants for TUI rendering.

/// Height of a search bar in lines (border + input line).
pub const SEARCH_INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Event poll timeout while no debounced search is pending.
pub const IDLE_POLL_MS: u64 = 500;

/// Results scrolled by one PageUp/PageDown.
pub const PAGE_SCROLL_LINES: usize = 10;
