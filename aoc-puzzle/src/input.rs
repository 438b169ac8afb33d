//! Puzzle input text and parsing helpers

use crate::error::SolveError;
use crate::key::PuzzleKey;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Where a puzzle input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Read from the local input cache
    CacheHit,
    /// Downloaded from upstream during this run
    Fetched,
    /// Supplied directly by the caller (tests, examples)
    Inline,
}

/// Raw puzzle input for one puzzle
///
/// Immutable once constructed. The text is reference counted so both parts of a
/// puzzle can read it from different threads without copying.
#[derive(Debug, Clone)]
pub struct PuzzleInput {
    key: PuzzleKey,
    text: Arc<str>,
    source: InputSource,
    retrieved_at: DateTime<Utc>,
}

impl PuzzleInput {
    pub fn new(
        key: PuzzleKey,
        text: impl Into<Arc<str>>,
        source: InputSource,
        retrieved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            text: text.into(),
            source,
            retrieved_at,
        }
    }

    /// Build an input from literal text, stamped with the current time
    ///
    /// # Example
    ///
    /// ```
    /// use aoc_puzzle::{PuzzleInput, PuzzleKey};
    ///
    /// let input = PuzzleInput::inline(PuzzleKey::new(2022, 1).unwrap(), "1\n2\n\n3\n");
    /// assert_eq!(input.lines().count(), 4);
    /// assert_eq!(input.clusters(), vec!["1\n2", "3"]);
    /// ```
    pub fn inline(key: PuzzleKey, text: &str) -> Self {
        Self::new(key, text, InputSource::Inline, Utc::now())
    }

    pub fn key(&self) -> PuzzleKey {
        self.key
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }

    /// The input exactly as stored
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// Lines of the input, without line terminators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Blocks of lines separated by at least one blank line
    pub fn clusters(&self) -> Vec<&str> {
        blank_lines()
            .split(self.text.trim_end())
            .filter(|cluster| !cluster.is_empty())
            .collect()
    }

    /// Characters of each line; `grid[row][col]`
    pub fn char_grid(&self) -> Vec<Vec<char>> {
        self.lines().map(|line| line.chars().collect()).collect()
    }

    /// Every signed integer in the input, in reading order
    pub fn numbers(&self) -> Vec<i64> {
        parse_numbers(&self.text)
    }

    /// Signed integers found on each line
    pub fn numbers_per_line(&self) -> Vec<Vec<i64>> {
        self.lines().map(parse_numbers).collect()
    }

    /// Whitespace-separated fields of each line
    pub fn words(&self) -> Vec<Vec<&str>> {
        self.lines().map(|line| line.split_whitespace().collect()).collect()
    }

    /// Each line split by `separator`
    ///
    /// ```
    /// use aoc_puzzle::{PuzzleInput, PuzzleKey, Regex};
    ///
    /// let input = PuzzleInput::inline(PuzzleKey::new(2022, 1).unwrap(), "ABC: 123\nXYZ: 789");
    /// let split = input.split_lines(&Regex::new(": ").unwrap());
    /// assert_eq!(split, vec![vec!["ABC", "123"], vec!["XYZ", "789"]]);
    /// ```
    pub fn split_lines(&self, separator: &Regex) -> Vec<Vec<&str>> {
        self.lines().map(|line| separator.split(line).collect()).collect()
    }

    /// Whitespace-separated fields read column by column
    ///
    /// The first line decides the column count; cells missing from shorter
    /// lines are left out of their column.
    pub fn columns(&self) -> Vec<Vec<&str>> {
        transpose(self.words())
    }

    /// Signed integers read column by column, see [`PuzzleInput::columns`]
    pub fn number_columns(&self) -> Vec<Vec<i64>> {
        transpose(self.numbers_per_line())
    }

    /// Single digits of each line; `grid[row][col]`
    pub fn digit_grid(&self) -> Result<Vec<Vec<u8>>, SolveError> {
        self.lines()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, c)| {
                        c.to_digit(10).map(|d| d as u8).ok_or_else(|| {
                            SolveError::InvalidInput(format!(
                                "expected a digit at line {}, column {}, found {:?}",
                                row + 1,
                                col + 1,
                                c
                            ))
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

fn transpose<T>(rows: Vec<Vec<T>>) -> Vec<Vec<T>> {
    let width = rows.first().map_or(0, Vec::len);
    let mut columns: Vec<Vec<T>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(cell);
        }
    }
    columns
}

fn blank_lines() -> &'static Regex {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    BLANK_LINES.get_or_init(|| Regex::new(r"\r?\n[ \t]*\r?\n\s*").unwrap())
}

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"-?\d+").unwrap())
}

fn parse_numbers(text: &str) -> Vec<i64> {
    number_regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
