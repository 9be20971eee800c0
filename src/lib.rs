//! Autosize
//!
//! Grows a multi-line text area to fit its content, bounded by optional
//! minimum and maximum row counts. Past the maximum the text area turns
//! scrollable.
//!
//! The fitting logic is framework-agnostic: [`attachment::Autosize`] talks
//! to its host through the [`surface`] traits and schedules lookup retries
//! through [`scheduler::Scheduler`]. The [`terminal`] module provides a
//! concrete cell-based surface, and [`view`] runs it interactively.

pub mod attachment;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod scheduler;
pub mod surface;
pub mod terminal;
pub mod view;

pub use attachment::{AttachPhase, Autosize, AutosizeOptions, LookupRetry, Recompute};
pub use model::{MeasureStrategy, Overflow, Px, RowConstraints};
