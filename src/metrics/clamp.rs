//! Height clamping policy.

use crate::model::{Overflow, Px, RowConstraints};

/// Final height and overflow for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Height to write back to the surface.
    pub height: Px,
    /// Overflow mode to write back to the surface.
    pub overflow: Overflow,
    /// Natural row count (natural height / line height), unrounded.
    pub natural_rows: f64,
}

/// Apply the min/max row policy to a measured natural height.
///
/// - minimum set and natural rows <= minimum: `min × line_height`, clipped
/// - otherwise maximum set and natural rows >= maximum: `max × line_height`, scrollable
/// - otherwise the natural height, clipped
///
/// The minimum is checked first, so with `min >= max` the minimum wins.
/// A zero line height is treated as one pixel.
pub fn fit_height(natural: Px, line_height: u32, constraints: RowConstraints) -> Fit {
    let line_height = line_height.max(1);
    let natural_rows = f64::from(natural.get()) / f64::from(line_height);

    let (height, overflow) = match (constraints.min_rows(), constraints.max_rows()) {
        (Some(min), _) if f64::from(min) >= natural_rows => {
            (Px::from_rows(min, line_height), Overflow::Clipped)
        }
        (_, Some(max)) if f64::from(max) <= natural_rows => {
            (Px::from_rows(max, line_height), Overflow::Scrollable)
        }
        _ => (natural, Overflow::Clipped),
    };

    Fit {
        height,
        overflow,
        natural_rows,
    }
}
