//! Natural-height measurement strategy.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the natural content height of a surface is measured.
///
/// Both strategies give the same answer; they differ in what gets
/// touched while measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeasureStrategy {
    /// Measure an invisible probe copy of the surface, then discard it.
    /// The live surface is never collapsed.
    #[default]
    Clone,
    /// Collapse the live surface to auto height and read its scroll height.
    Live,
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown measure strategy '{0}' (expected 'clone' or 'live')")]
pub struct InvalidStrategy(pub String);

impl FromStr for MeasureStrategy {
    type Err = InvalidStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clone" => Ok(MeasureStrategy::Clone),
            "live" => Ok(MeasureStrategy::Live),
            _ => Err(InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for MeasureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureStrategy::Clone => f.write_str("clone"),
            MeasureStrategy::Live => f.write_str("live"),
        }
    }
}
