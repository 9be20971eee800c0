//! Status line below the text area.

use crate::model::RowConstraints;
use crate::terminal::TextArea;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

fn bound(rows: Option<u32>) -> String {
    rows.map_or_else(|| "-".to_string(), |n| n.to_string())
}

/// Plain-text summary of the text area's fitted state.
///
/// `None` text area means the attachment has not bound yet.
pub fn status_text(text_area: Option<&TextArea>, constraints: RowConstraints) -> String {
    let limits = format!(
        "min {} max {}",
        bound(constraints.min_rows()),
        bound(constraints.max_rows())
    );

    match text_area {
        Some(text_area) => {
            let height = text_area
                .height()
                .map_or_else(|| "auto".to_string(), |h| h.to_string());
            format!(
                "rows {} | {} | {} | {}",
                text_area.visible_rows(),
                height,
                text_area.overflow(),
                limits
            )
        }
        None => format!("waiting for text area | {}", limits),
    }
}

/// Styled status line; a pending warning replaces the summary.
pub fn status_line(summary: String, warning: Option<&str>) -> Line<'static> {
    match warning {
        Some(warning) => Line::from(Span::styled(
            format!("warning: {}", warning),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(summary, Style::default().fg(Color::DarkGray))),
    }
}
