//! Search bar widget, the terminal rendition of a generated search form.

use crate::state::InputBuffer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Bordered input box titled with the form label.
pub struct SearchBar<'a> {
    label: Option<&'a str>,
    buffer: &'a InputBuffer,
    focused: bool,
}

impl<'a> SearchBar<'a> {
    /// Focused bar showing `buffer`.
    pub fn new(label: Option<&'a str>, buffer: &'a InputBuffer) -> Self {
        Self {
            label,
            buffer,
            focused: true,
        }
    }

    /// Unfocused bars render the text without a cursor.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Longest suffix of `text` that fits in `width` cells, so the cursor cell
/// stays inside the borders.
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (i, ch) in text.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }
    &text[start..]
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let query = self.buffer.text();
        let cursor = self.buffer.cursor();

        let line = if self.focused {
            let inner_width = usize::from(area.width.saturating_sub(2));
            let split = query
                .char_indices()
                .nth(cursor)
                .map(|(i, _)| i)
                .unwrap_or(query.len());
            let before = visible_tail(&query[..split], inner_width.saturating_sub(1));
            let mut after = query[split..].chars();
            let cursor_char = after.next().map(String::from).unwrap_or_else(|| " ".to_string());
            let after_text: String = after.collect();

            Line::from(vec![
                Span::raw(before),
                Span::styled(
                    cursor_char,
                    Style::default()
                        .bg(Color::White)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(after_text),
            ])
        } else {
            Line::from(query)
        };

        let mut block = Block::default().borders(Borders::ALL);
        if let Some(label) = self.label {
            block = block.title(label);
        }

        Paragraph::new(line).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(bar: SearchBar<'_>) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(bar, frame.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area().width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn renders_label_and_query() {
        let input = InputBuffer::new("ap");
        let buffer = render(SearchBar::new(Some("Search:"), &input));

        assert!(row(&buffer, 0).contains("Search:"));
        assert!(row(&buffer, 1).contains("ap"));
    }

    #[test]
    fn cursor_cell_is_highlighted() {
        let input = InputBuffer::new("ap");
        let buffer = render(SearchBar::new(None, &input));

        // border + "ap" puts the end-of-text cursor at column 3
        assert_eq!(buffer[(3, 1)].bg, Color::White);
        assert_ne!(buffer[(1, 1)].bg, Color::White);
    }

    #[test]
    fn long_query_scrolls_to_keep_cursor_visible() {
        let input = InputBuffer::new("abcdefghijklmnopqrstuvwxyz0123456789");
        let buffer = render(SearchBar::new(None, &input));

        // 28 inner cells: the last 27 characters, then the cursor
        assert!(row(&buffer, 1).contains("jklmnopqrstuvwxyz0123456789"));
        assert!(!row(&buffer, 1).contains("abc"));
        assert_eq!(buffer[(28, 1)].bg, Color::White);
    }

    #[test]
    fn wide_characters_scroll_by_cell_width() {
        let input = InputBuffer::new("あいうえおかきくけこさしすせそたちつてと");
        let buffer = render(SearchBar::new(None, &input));

        // 13 double-width characters fill 26 of 28 cells, the cursor follows
        assert_eq!(buffer[(1, 1)].symbol(), "く");
        assert_eq!(buffer[(25, 1)].symbol(), "と");
        assert_eq!(buffer[(27, 1)].bg, Color::White);
        assert!(!row(&buffer, 1).contains('あ'));
    }

    #[test]
    fn cursor_inside_long_query_keeps_text_after_it() {
        let mut input = InputBuffer::new("abcdefghijklmnopqrstuvwxyz0123456789");
        for _ in 0..10 {
            input = crate::state::input_handler::handle_cursor_left(input);
        }
        let buffer = render(SearchBar::new(None, &input));

        // cursor sits on "0" right after the 26 letters
        assert_eq!(buffer[(27, 1)].symbol(), "0");
        assert_eq!(buffer[(27, 1)].bg, Color::White);
        assert_eq!(buffer[(1, 1)].symbol(), "a");
    }

    #[test]
    fn visible_tail_handles_narrow_widths() {
        assert_eq!(visible_tail("abc", 0), "");
        assert_eq!(visible_tail("abc", 2), "bc");
        assert_eq!(visible_tail("abc", 10), "abc");
        assert_eq!(visible_tail("日本", 3), "本");
    }

    #[test]
    fn unfocused_bar_has_no_cursor() {
        let input = InputBuffer::new("ap");
        let buffer = render(SearchBar::new(None, &input).focused(false));

        assert_ne!(buffer[(3, 1)].bg, Color::White);
        assert!(!row(&buffer, 0).contains("Search"));
    }
}
