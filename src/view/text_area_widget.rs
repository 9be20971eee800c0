//! Text area widget.

use crate::terminal::TextArea;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Renders a [`TextArea`] at its current height.
///
/// Only `visible_rows` display lines are drawn. A clipped text area shows
/// its first lines; a scrollable one scrolls to keep the cursor in view.
pub struct AutosizeTextArea<'a> {
    text_area: &'a TextArea,
    title: Option<&'a str>,
}

impl<'a> AutosizeTextArea<'a> {
    /// Create new widget for `text_area`.
    pub fn new(text_area: &'a TextArea) -> Self {
        Self {
            text_area,
            title: None,
        }
    }

    /// Set a block title.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Index of the first display line drawn.
    pub fn scroll_offset(&self) -> usize {
        if !self.text_area.overflow().is_scrollable() {
            return 0;
        }
        let rows = usize::from(self.text_area.visible_rows());
        (self.text_area.cursor_line() + 1).saturating_sub(rows)
    }
}

impl Widget for AutosizeTextArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = usize::from(self.text_area.visible_rows());
        let lines: Vec<Line> = self
            .text_area
            .display_lines()
            .into_iter()
            .skip(self.scroll_offset())
            .take(rows)
            .map(Line::from)
            .collect();

        let border_style = if self.text_area.overflow().is_scrollable() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if let Some(title) = self.title {
            block = block.title(title);
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
