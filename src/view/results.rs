//! Matched item list and the "no results" message.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Results pane. Shows the alert text instead of items when a pass matched nothing.
pub struct ResultsList<'a> {
    items: &'a [String],
    alert: Option<&'a str>,
    title: String,
    offset: usize,
}

impl<'a> ResultsList<'a> {
    /// Pane listing `items`, titled with the match count.
    pub fn new(items: &'a [String], matched: usize, total: usize) -> Self {
        Self {
            items,
            alert: None,
            title: format!("{} of {}", matched, total),
            offset: 0,
        }
    }

    /// Message shown in place of the items.
    pub fn alert(mut self, alert: Option<&'a str>) -> Self {
        self.alert = alert;
        self
    }

    /// Index of the first item shown.
    ///
    /// Clamped when rendering so the last page stays full.
    pub fn scroll(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Widget for ResultsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(self.title);

        let lines: Vec<Line> = match self.alert {
            Some(alert) => vec![Line::styled(
                alert.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )],
            None => {
                let visible = usize::from(area.height.saturating_sub(2));
                let start = self.offset.min(self.items.len().saturating_sub(visible));
                self.items
                    .iter()
                    .skip(start)
                    .map(|item| Line::styled(item.as_str(), Style::default().fg(Color::Green)))
                    .collect()
            }
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
