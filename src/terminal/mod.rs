//! Terminal rendering engine for the attachment.
//!
//! A [`TextArea`] is a wrapped multi-line text buffer measured in terminal
//! cells, exposed to the attachment through [`TextAreaHandle`]. Text areas
//! live in a small [`HostNode`] tree so the attachment can be declared on a
//! container and find the text area inside it, including inside shadow
//! content, with [`TreeLocator`].

pub mod host;
pub mod locator;
pub mod text_area;
pub mod wrap;

pub use host::{HostNode, HostRef, NodeKind};
pub use locator::TreeLocator;
pub use text_area::{CellMetrics, TextArea, TextAreaHandle, TextAreaProbe};
pub use wrap::wrap_lines;
