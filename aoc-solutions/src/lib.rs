//! Advent of Code puzzle solutions with automatic registration
//!
//! This crate contains actual puzzle solutions organized by year.
//! Each solution uses the `AdventSolution` derive macro, so linking the crate
//! is enough for `SolutionRegistry::build` to find it.

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
