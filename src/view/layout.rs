//! Screen layout: search bars around the results pane, status bar at the bottom.

use crate::config::SearchLocation;
use crate::state::InputBuffer;
use crate::view::constants::{SEARCH_INPUT_HEIGHT, STATUS_BAR_HEIGHT};
use crate::view::{ResultsList, SearchBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// Everything one frame shows, extracted from the controller beforehand.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    /// Search bar title.
    pub label: Option<String>,
    /// Which sides of the results pane get a search bar.
    pub location: SearchLocation,
    /// Query being edited.
    pub input: InputBuffer,
    /// Texts of the current matches.
    pub results: Vec<String>,
    /// "No results" message text.
    pub alert: Option<String>,
    /// Index of the first result shown.
    pub scroll: usize,
    /// Match count of the last pass.
    pub matched: usize,
    /// Items considered by the last pass.
    pub total: usize,
    /// Transient message, e.g. a pattern error.
    pub status: Option<String>,
}

/// Which slots get a search bar.
fn bar_slots(location: &SearchLocation) -> (bool, bool) {
    match location {
        SearchLocation::Before | SearchLocation::Into(_) => (true, false),
        SearchLocation::After => (false, true),
        SearchLocation::Both => (true, true),
    }
}

/// Draw one frame: search bars, results pane and status bar.
pub fn render_layout(frame: &mut Frame, screen: &Screen) {
    let (top, bottom) = bar_slots(&screen.location);
    let bar_height = |shown: bool| if shown { SEARCH_INPUT_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(bar_height(top)),
            Constraint::Min(0),
            Constraint::Length(bar_height(bottom)),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame.area());

    let label = screen.label.as_deref();
    if top {
        frame.render_widget(SearchBar::new(label, &screen.input), chunks[0]);
    }
    frame.render_widget(
        ResultsList::new(&screen.results, screen.matched, screen.total)
            .alert(screen.alert.as_deref())
            .scroll(screen.scroll),
        chunks[1],
    );
    if bottom {
        // one cursor on screen is enough
        frame.render_widget(
            SearchBar::new(label, &screen.input).focused(!top),
            chunks[2],
        );
    }
    render_status_bar(frame, chunks[3], screen);
}

fn render_status_bar(frame: &mut Frame, area: Rect, screen: &Screen) {
    const HINTS: &str = "Enter search | Esc clear | ^R reload | ^D dismiss | ^C quit | PgUp/PgDn scroll";

    let (text, style) = match &screen.status {
        Some(message) => (
            format!(" {} | {}", message, HINTS),
            Style::default().fg(Color::Red),
        ),
        None => (format!(" {}", HINTS), Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(Line::styled(text, style)), area);
}
