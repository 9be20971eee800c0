//! Overflow mode of a text surface.

use std::fmt;

/// How content taller than the surface's height is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    /// Content beyond the height is hidden.
    #[default]
    Clipped,
    /// Content beyond the height is reachable by scrolling.
    Scrollable,
}

impl Overflow {
    /// CSS keyword for this mode.
    pub fn as_css(self) -> &'static str {
        match self {
            Overflow::Clipped => "hidden",
            Overflow::Scrollable => "auto",
        }
    }

    /// Whether content can be scrolled.
    pub fn is_scrollable(self) -> bool {
        matches!(self, Overflow::Scrollable)
    }
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}
