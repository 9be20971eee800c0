//! Locating a text area under a host node.

use super::host::{HostNode, HostRef};
use super::text_area::TextAreaHandle;
use crate::surface::SurfaceLocator;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Finds the text area an attachment on `host` should drive.
///
/// - host is a text area: the host itself
/// - otherwise the first text area among its light descendants
/// - otherwise the first text area in its shadow content
///
/// The locator holds the host weakly. Once the view drops the host the
/// locator reports itself dead and never finds anything.
#[derive(Debug, Clone)]
pub struct TreeLocator {
    host: Weak<RefCell<HostNode>>,
}

impl TreeLocator {
    /// Locator for the given host.
    pub fn new(host: &HostRef) -> Self {
        Self {
            host: Rc::downgrade(host),
        }
    }
}

impl SurfaceLocator for TreeLocator {
    type Surface = TextAreaHandle;

    fn locate(&mut self) -> Option<TextAreaHandle> {
        let host = self.host.upgrade()?;
        let host = host.borrow();

        if let Some(handle) = host.as_text_area() {
            return Some(handle.clone());
        }

        let found = host
            .query_text_area()
            .or_else(|| host.query_shadow_text_area());
        trace!(
            found = found.is_some(),
            kind = ?host.kind(),
            "autosize: host subtree searched"
        );
        found
    }

    fn is_alive(&self) -> bool {
        self.host.strong_count() > 0
    }
}
