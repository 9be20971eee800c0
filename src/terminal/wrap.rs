//! Character wrapping by display width.

use unicode_width::UnicodeWidthChar;

/// Split `value` into display lines no wider than `width` columns.
///
/// Hard line breaks (`\n`) always start a new line, and a trailing break
/// yields a trailing empty line, so an empty value is one empty line.
/// Characters wider than the whole width get a line of their own.
/// Zero-width characters stay attached to the preceding character.
pub fn wrap_lines(value: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for logical in value.split('\n') {
        let mut current = String::new();
        let mut used = 0;
        for ch in logical.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used > 0 && used + ch_width > width {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(ch);
            used += ch_width;
        }
        lines.push(current);
    }

    lines
}
