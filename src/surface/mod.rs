//! Capability traits between the attachment and a rendering engine.
//!
//! The attachment never walks a render tree or reads styles directly. It
//! asks a [`SurfaceLocator`] for a [`TextSurface`] once, then drives that
//! surface through the handful of operations below.

use crate::metrics::StyleSnapshot;
use crate::model::{Overflow, Px};

/// A multi-line editable text element whose height can be controlled.
pub trait TextSurface {
    /// Invisible measurement copy produced by [`TextSurface::spawn_probe`].
    type Probe: MeasureProbe;

    /// Current text value.
    fn value(&self) -> String;

    /// Current explicit height, `None` meaning auto.
    fn height(&self) -> Option<Px>;

    /// Set the explicit height. `None` collapses the surface to auto height.
    fn set_height(&mut self, height: Option<Px>);

    /// Current overflow mode.
    fn overflow(&self) -> Overflow;

    /// Set the overflow mode.
    fn set_overflow(&mut self, overflow: Overflow);

    /// Set the presentation row-count attribute.
    fn set_rows(&mut self, rows: u32);

    /// Height needed to show the whole value without scrolling, or the
    /// explicit height if that is larger.
    fn scroll_height(&self) -> Px;

    /// Inline and computed style values relevant to line height.
    fn style(&self) -> StyleSnapshot;

    /// Create a detached copy of this surface for measurement.
    ///
    /// The probe must not affect layout of the live surface. Dropping it
    /// removes it.
    fn spawn_probe(&self) -> Self::Probe;
}

/// A throwaway copy of a surface used only to read its natural height.
pub trait MeasureProbe {
    /// Make the probe invisible.
    fn hide(&mut self);

    /// Set the probe's overflow mode.
    fn set_overflow(&mut self, overflow: Overflow);

    /// Set the probe's height. `None` means auto.
    fn set_height(&mut self, height: Option<Px>);

    /// Scroll height of the probe.
    fn scroll_height(&self) -> Px;
}

/// Finds the text surface an attachment should drive.
///
/// The locator is handed the host the attachment was declared on. The host
/// may be the text surface itself or a container that renders one
/// somewhere in its subtree, possibly only after a later render pass.
pub trait SurfaceLocator {
    /// Surface type this locator produces.
    type Surface: TextSurface;

    /// Search for the surface. `None` means "not rendered yet".
    fn locate(&mut self) -> Option<Self::Surface>;

    /// Whether the host still exists. A locator whose host has been torn
    /// down will never find anything.
    fn is_alive(&self) -> bool {
        true
    }
}
