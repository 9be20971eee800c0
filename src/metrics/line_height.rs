//! Line-height resolution.
//!
//! Resolution order:
//! 1. Inline style `line-height`, if it parses to a positive number
//! 2. Computed style `line-height`, if it parses to a positive number
//! 3. `floor(font_size × 1.2)` from the computed font size
//!
//! Step 3 falls back to [`DEFAULT_FONT_SIZE_PX`] when the font size
//! itself is unusable, so resolution always yields a positive height.

use super::parse::parse_css_int;

/// Multiplier applied to the font size when no line height is available.
pub const FONT_SIZE_LINE_HEIGHT_RATIO: f64 = 1.2;

/// Font size assumed when the surface reports none.
pub const DEFAULT_FONT_SIZE_PX: u32 = 16;

/// Raw style values read from a surface, as the engine reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    /// Inline (explicitly set) `line-height`, e.g. `"20px"`.
    pub inline_line_height: Option<String>,
    /// Computed `line-height`, e.g. `"20px"` or `"normal"`.
    pub computed_line_height: Option<String>,
    /// Computed `font-size`, e.g. `"16px"`.
    pub computed_font_size: Option<String>,
}

/// Where a resolved line height came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineHeightSource {
    /// Explicit inline style.
    Inline,
    /// Computed style.
    Computed,
    /// Derived from the font size.
    FontSize,
}

/// A resolved, positive line height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHeight {
    /// Height of one row in pixels. Always at least 1.
    pub px: u32,
    /// Which step of the fallback chain produced it.
    pub source: LineHeightSource,
}

fn positive_px(raw: Option<&str>) -> Option<u32> {
    raw.and_then(parse_css_int)
        .filter(|&n| n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Resolve the line height of a surface from its style snapshot.
pub fn resolve_line_height(style: &StyleSnapshot) -> LineHeight {
    if let Some(px) = positive_px(style.inline_line_height.as_deref()) {
        return LineHeight {
            px,
            source: LineHeightSource::Inline,
        };
    }

    if let Some(px) = positive_px(style.computed_line_height.as_deref()) {
        return LineHeight {
            px,
            source: LineHeightSource::Computed,
        };
    }

    let font_size =
        positive_px(style.computed_font_size.as_deref()).unwrap_or(DEFAULT_FONT_SIZE_PX);
    let derived = (f64::from(font_size) * FONT_SIZE_LINE_HEIGHT_RATIO).floor() as u32;
    LineHeight {
        px: derived.max(1),
        source: LineHeightSource::FontSize,
    }
}
