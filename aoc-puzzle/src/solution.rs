//! The two-part solution capability and its answer type

use crate::error::SolveError;
use crate::input::PuzzleInput;
use std::fmt;

/// One of the two sub-answers every puzzle asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    One,
    Two,
}

impl Part {
    /// Both parts, in execution order
    pub const ALL: [Part; 2] = [Part::One, Part::Two];

    /// The part number as printed on the puzzle page
    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }

    /// Inverse of [`Part::number`]
    pub fn from_number(number: u8) -> Option<Part> {
        match number {
            1 => Some(Part::One),
            2 => Some(Part::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A produced answer, serialized to text for display
///
/// Solutions usually build one with `.into()` from a number or string:
///
/// ```
/// use aoc_puzzle::Answer;
///
/// let answer: Answer = 42u64.into();
/// assert_eq!(answer.as_str(), "42");
/// assert!(Answer::from("  ").is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Answer(String);

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Answer(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// An answer with no visible content is never a valid submission
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! answer_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Answer {
                fn from(value: $ty) -> Self {
                    Answer(value.to_string())
                }
            }
        )*
    };
}

answer_from_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, &str, String,
);

/// Capability every registered puzzle solution implements
///
/// Both parts must be pure functions of the input: no hidden mutable state and no
/// I/O. The engine relies on this to run the two parts (and different puzzles)
/// concurrently and to re-run them safely.
///
/// # Example
///
/// ```
/// use aoc_puzzle::{Answer, PuzzleInput, PuzzleKey, PuzzleSolution, SolveError};
///
/// struct Day1;
///
/// impl PuzzleSolution for Day1 {
///     fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
///         Ok(input.numbers().iter().sum::<i64>().into())
///     }
///
///     fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
///         Ok(input.numbers().iter().product::<i64>().into())
///     }
/// }
///
/// let input = PuzzleInput::inline(PuzzleKey::new(2023, 1).unwrap(), "2\n3\n4");
/// assert_eq!(Day1.part1(&input).unwrap().as_str(), "9");
/// assert_eq!(Day1.part2(&input).unwrap().as_str(), "24");
/// ```
pub trait PuzzleSolution: Send + Sync {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError>;

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError>;

    /// Dispatch to the requested part
    fn solve(&self, part: Part, input: &PuzzleInput) -> Result<Answer, SolveError> {
        match part {
            Part::One => self.part1(input),
            Part::Two => self.part2(input),
        }
    }
}

impl<T: PuzzleSolution + ?Sized> PuzzleSolution for &'static T {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        (**self).part1(input)
    }

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        (**self).part2(input)
    }
}

/// Signature of a single part implemented as a plain function
pub type PartFn = fn(&PuzzleInput) -> Result<Answer, SolveError>;

/// A solution given as a pair of functions
#[derive(Clone, Copy)]
pub struct FnSolution {
    pub part1: PartFn,
    pub part2: PartFn,
}

impl PuzzleSolution for FnSolution {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        (self.part1)(input)
    }

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        (self.part2)(input)
    }
}

impl fmt::Debug for FnSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSolution").finish_non_exhaustive()
    }
}
