//! Domain model types (pure).
//!
//! All types in this module are plain data with smart constructors.
//! Nothing here touches a rendering engine.

pub mod constraints;
pub mod error;
pub mod overflow;
pub mod px;
pub mod strategy;

// Re-export for convenience
pub use constraints::RowConstraints;
pub use error::AppError;
pub use overflow::Overflow;
pub use px::Px;
pub use strategy::{InvalidStrategy, MeasureStrategy};
