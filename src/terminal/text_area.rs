//! Wrapped multi-line text buffer measured in terminal cells.

use super::wrap::wrap_lines;
use crate::metrics::{resolve_line_height, StyleSnapshot};
use crate::model::{Overflow, Px};
use crate::surface::{MeasureProbe, TextSurface};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Pixel metrics of one terminal cell row.
///
/// `line_height_px: None` reports a computed line height of `"normal"`,
/// leaving the font size to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    /// Computed line height, if the theme pins one.
    pub line_height_px: Option<u32>,
    /// Computed font size.
    pub font_size_px: u32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            line_height_px: Some(20),
            font_size_px: 16,
        }
    }
}

/// A multi-line editable text area.
///
/// Edits keep `cursor` as a char index into `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    value: String,
    cursor: usize,
    width: u16,
    height: Option<Px>,
    overflow: Overflow,
    rows: u32,
    inline_line_height: Option<String>,
    metrics: CellMetrics,
}

impl TextArea {
    /// Create an empty text area `width` columns wide.
    pub fn new(width: u16) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            width,
            height: None,
            overflow: Overflow::Clipped,
            rows: 2,
            inline_line_height: None,
            metrics: CellMetrics::default(),
        }
    }

    /// Builder: initial value, cursor at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Builder: cell metrics.
    pub fn with_metrics(mut self, metrics: CellMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builder: inline `line-height` style.
    pub fn with_inline_line_height(mut self, line_height: impl Into<String>) -> Self {
        self.inline_line_height = Some(line_height.into());
        self
    }

    /// Current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    /// Cursor position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Content width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Change the content width. Wrapping, and so natural height, follows.
    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    /// Explicit height, `None` meaning auto.
    pub fn height(&self) -> Option<Px> {
        self.height
    }

    /// Overflow mode.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Presentation row-count attribute.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell metrics.
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Style values as the engine reports them.
    pub fn style(&self) -> StyleSnapshot {
        StyleSnapshot {
            inline_line_height: self.inline_line_height.clone(),
            computed_line_height: Some(match self.metrics.line_height_px {
                Some(px) => format!("{px}px"),
                None => "normal".to_string(),
            }),
            computed_font_size: Some(format!("{}px", self.metrics.font_size_px)),
        }
    }

    /// Pixel height of one rendered row.
    pub fn row_px(&self) -> u32 {
        resolve_line_height(&self.style()).px
    }

    /// Value wrapped to the content width.
    pub fn display_lines(&self) -> Vec<String> {
        wrap_lines(&self.value, self.width)
    }

    /// Height of the full wrapped content.
    pub fn content_height(&self) -> Px {
        content_height(&self.value, self.width, self.row_px())
    }

    /// Terminal rows the text area occupies.
    ///
    /// Auto height shows every display line; an explicit height is rounded
    /// up to whole rows.
    pub fn visible_rows(&self) -> u16 {
        let rows = match self.height {
            Some(height) => height.rows_at(self.row_px()),
            None => self.display_lines().len() as u32,
        };
        u16::try_from(rows.max(1)).unwrap_or(u16::MAX)
    }

    /// Display line the cursor sits on.
    ///
    /// Agrees with [`wrap_lines`]: a cursor at the end of a full line stays
    /// on that line until a character actually wraps.
    pub fn cursor_line(&self) -> usize {
        self.cursor_position().0
    }

    /// Display column of the cursor within its line, clamped to the last
    /// cell.
    pub fn cursor_column(&self) -> u16 {
        self.cursor_position().1
    }

    fn cursor_position(&self) -> (usize, u16) {
        let prefix: String = self.value.chars().take(self.cursor).collect();
        let lines = wrap_lines(&prefix, self.width);
        let last_width = lines
            .last()
            .map(|l| unicode_width::UnicodeWidthStr::width(l.as_str()))
            .unwrap_or(0);
        let last_cell = usize::from(self.width.max(1) - 1);
        let column = u16::try_from(last_width.min(last_cell)).unwrap_or(u16::MAX);
        (lines.len().saturating_sub(1), column)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the cursor and advance it.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a hard line break at the cursor.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor. No-op at the start.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    /// Move the cursor one character left, saturating at 0.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right, saturating at the end.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }
}

fn content_height(value: &str, width: u16, row_px: u32) -> Px {
    let lines = wrap_lines(value, width).len() as u32;
    Px::from_rows(lines, row_px)
}

/// Shared handle to a [`TextArea`].
///
/// The view draws through one handle while the attachment drives another;
/// both point at the same text area.
#[derive(Debug, Clone)]
pub struct TextAreaHandle(Rc<RefCell<TextArea>>);

impl TextAreaHandle {
    /// Wrap a text area in a new handle.
    pub fn new(text_area: TextArea) -> Self {
        Self(Rc::new(RefCell::new(text_area)))
    }

    /// Borrow the text area.
    pub fn borrow(&self) -> Ref<'_, TextArea> {
        self.0.borrow()
    }

    /// Borrow the text area mutably.
    pub fn borrow_mut(&self) -> RefMut<'_, TextArea> {
        self.0.borrow_mut()
    }

    /// Whether two handles point at the same text area.
    pub fn ptr_eq(&self, other: &TextAreaHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl TextSurface for TextAreaHandle {
    type Probe = TextAreaProbe;

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn height(&self) -> Option<Px> {
        self.0.borrow().height
    }

    fn set_height(&mut self, height: Option<Px>) {
        self.0.borrow_mut().height = height;
    }

    fn overflow(&self) -> Overflow {
        self.0.borrow().overflow
    }

    fn set_overflow(&mut self, overflow: Overflow) {
        self.0.borrow_mut().overflow = overflow;
    }

    fn set_rows(&mut self, rows: u32) {
        self.0.borrow_mut().rows = rows;
    }

    fn scroll_height(&self) -> Px {
        let text_area = self.0.borrow();
        let content = text_area.content_height();
        text_area.height.map_or(content, |h| content.max(h))
    }

    fn style(&self) -> StyleSnapshot {
        self.0.borrow().style()
    }

    fn spawn_probe(&self) -> TextAreaProbe {
        let text_area = self.0.borrow();
        TextAreaProbe {
            value: text_area.value.clone(),
            width: text_area.width,
            row_px: text_area.row_px(),
            height: text_area.height,
            overflow: text_area.overflow,
            hidden: false,
        }
    }
}

/// Detached copy of a text area. Never drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAreaProbe {
    value: String,
    width: u16,
    row_px: u32,
    height: Option<Px>,
    overflow: Overflow,
    hidden: bool,
}

impl TextAreaProbe {
    /// Whether the probe has been hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Overflow mode set on the probe.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }
}

impl MeasureProbe for TextAreaProbe {
    fn hide(&mut self) {
        self.hidden = true;
    }

    fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    fn set_height(&mut self, height: Option<Px>) {
        self.height = height;
    }

    fn scroll_height(&self) -> Px {
        let content = content_height(&self.value, self.width, self.row_px);
        self.height.map_or(content, |h| content.max(h))
    }
}
