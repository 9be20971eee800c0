//! Minimum/maximum row constraints.

/// Optional lower and upper bounds on the number of visible rows.
///
/// A bound of zero means "unset": a zero minimum never clamps and a zero
/// maximum never caps, matching how the embedding view leaves a bound out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowConstraints {
    min_rows: Option<u32>,
    max_rows: Option<u32>,
}

impl RowConstraints {
    /// No constraints: the surface always takes its natural height.
    pub const UNBOUNDED: RowConstraints = RowConstraints {
        min_rows: None,
        max_rows: None,
    };

    /// Smart constructor: zero bounds are normalized to `None`.
    pub fn new(min_rows: Option<u32>, max_rows: Option<u32>) -> Self {
        Self {
            min_rows: min_rows.filter(|&n| n > 0),
            max_rows: max_rows.filter(|&n| n > 0),
        }
    }

    /// Lower bound, if set.
    pub fn min_rows(&self) -> Option<u32> {
        self.min_rows
    }

    /// Upper bound, if set.
    pub fn max_rows(&self) -> Option<u32> {
        self.max_rows
    }

    /// Copy with a new lower bound.
    pub fn with_min_rows(self, min_rows: Option<u32>) -> Self {
        Self::new(min_rows, self.max_rows)
    }

    /// Copy with a new upper bound.
    pub fn with_max_rows(self, max_rows: Option<u32>) -> Self {
        Self::new(self.min_rows, max_rows)
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min_rows.is_none() && self.max_rows.is_none()
    }
}
