//! Text metrics (pure).
//!
//! Everything needed to turn a measured natural height into a final
//! height: lenient CSS number parsing, the line-height fallback chain and
//! the min/max row clamp. No rendering engine is touched here.

pub mod clamp;
pub mod line_height;
pub mod parse;

pub use clamp::{fit_height, Fit};
pub use line_height::{resolve_line_height, LineHeight, LineHeightSource, StyleSnapshot};
pub use parse::parse_css_int;
