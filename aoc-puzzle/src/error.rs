//! Error types for the puzzle library

use crate::key::PuzzleKey;
use crate::solution::Part;
use thiserror::Error;

/// Error type for out-of-range puzzle coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Year before the first Advent of Code or beyond the registry capacity
    #[error("year {0} is outside the supported range 2015..=2034")]
    Year(u16),
    /// Day outside the 1..=25 calendar
    #[error("day {0} is outside the range 1..=25")]
    Day(u8),
}

/// Error type returned by user solution code
#[derive(Debug, Error)]
pub enum SolveError {
    /// The part has not been written yet (scaffold placeholder)
    #[error("part {0} is not implemented")]
    NotImplemented(Part),
    /// The puzzle input does not have the expected shape
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Any other failure raised while solving
    #[error("solve failed: {0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SolveError {
    /// Wrap an arbitrary error (including `anyhow::Error`) as a solve failure
    pub fn failed(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SolveError::Failed(error.into())
    }
}

/// Error type for registration failures, fatal at registry-build time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two declarations claim the same puzzle
    #[error("puzzle {key} is claimed by both `{existing}` and `{duplicate}`")]
    Conflict {
        key: PuzzleKey,
        existing: String,
        duplicate: String,
    },
    /// A declaration names a year/day outside the calendar
    #[error("`{name}` declares an invalid puzzle: {source}")]
    InvalidKey {
        name: String,
        #[source]
        source: KeyError,
    },
}
