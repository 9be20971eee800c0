//! Device-independent pixel length.

use std::fmt;

/// A vertical length in device-independent pixels.
///
/// Displays in CSS form (`"80px"`), which is how heights are written back
/// to a text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Px(u32);

impl Px {
    /// Zero length.
    pub const ZERO: Px = Px(0);

    /// Create a length from a raw pixel count.
    pub const fn new(px: u32) -> Self {
        Self(px)
    }

    /// Height of `rows` rows at the given line height.
    pub fn from_rows(rows: u32, line_height: u32) -> Self {
        Self(rows.saturating_mul(line_height))
    }

    /// Raw pixel count.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Number of whole rows needed to show this length, rounding up.
    ///
    /// A zero line height yields zero rows.
    pub fn rows_at(self, line_height: u32) -> u32 {
        if line_height == 0 {
            return 0;
        }
        self.0.div_ceil(line_height)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}
