//! Advent of Code Puzzle Library
//!
//! The framework side of an Advent of Code solving harness: puzzle identity, puzzle
//! input, the two-part solution capability, and a registry that maps every
//! implemented (year, day) to its solution.
//!
//! # Overview
//!
//! This library provides:
//! - [`PuzzleKey`], a validated (year, day) pair with the release schedule
//! - [`PuzzleInput`], immutable input text with common parsing helpers
//! - [`PuzzleSolution`], the pure `part1`/`part2` capability
//! - [`SolutionRegistry`], built once at startup from declared solutions
//!
//! Fetching, caching and running solutions live in the `aoc` command-line crate.
//!
//! # Quick Example
//!
//! ```
//! use aoc_puzzle::{Answer, Part, PuzzleInput, PuzzleKey, PuzzleSolution, RegistryBuilder, SolveError};
//!
//! struct Sum;
//!
//! impl PuzzleSolution for Sum {
//!     fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
//!         Ok(input.numbers().iter().sum::<i64>().into())
//!     }
//!
//!     fn part2(&self, _input: &PuzzleInput) -> Result<Answer, SolveError> {
//!         Err(SolveError::NotImplemented(Part::Two))
//!     }
//! }
//!
//! let key = PuzzleKey::new(2023, 1).unwrap();
//! let registry = RegistryBuilder::new().register(key, "Sum", Sum).unwrap().build();
//!
//! let input = PuzzleInput::inline(key, "1\n2\n3");
//! let solution = registry.lookup(key).unwrap().solution();
//! assert_eq!(solution.solve(Part::One, &input).unwrap().as_str(), "6");
//! assert!(solution.solve(Part::Two, &input).is_err());
//! ```
//!
//! # Automatic Registration
//!
//! Use `#[derive(AdventSolution)]` to register a unit struct without touching any
//! central list:
//!
//! ```ignore
//! #[derive(AdventSolution)]
//! #[advent(year = 2023, day = 1)]
//! pub struct Day01;
//! ```
//!
//! The `day` may be omitted when the type name carries it (`Day07` is day 7).
//! [`SolutionRegistry::build`] then collects every linked declaration and fails
//! fast if two of them claim the same puzzle.

mod error;
mod input;
mod key;
mod registry;
mod solution;

// Re-export public API
pub use error::{KeyError, RegistrationError, SolveError};
pub use input::{InputSource, PuzzleInput};
pub use key::{CAPACITY, DAYS_PER_YEAR, FIRST_YEAR, MAX_YEARS, PuzzleKey};
pub use registry::{RegistryBuilder, SolutionDescriptor, SolutionPlugin, SolutionRegistry};
pub use solution::{Answer, FnSolution, Part, PartFn, PuzzleSolution};

// Pattern type taken by `PuzzleInput::split_lines`
pub use regex::Regex;

// Re-export inventory for use by the derive macro
pub use inventory;

// Re-export the derive macro
pub use aoc_puzzle_macros::AdventSolution;
