use anyhow::{Context, anyhow};
use aoc_puzzle::{AdventSolution, Answer, PuzzleInput, PuzzleSolution, SolveError};
use std::ops::RangeInclusive;

// Day is taken from the type name
#[derive(AdventSolution)]
#[advent(year = 2025)]
pub struct Day02;

impl PuzzleSolution for Day02 {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(sum_invalid(&parse(input)?, |id| repeats(id, Some(2))).into())
    }

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(sum_invalid(&parse(input)?, |id| repeats(id, None)).into())
    }
}

fn parse(input: &PuzzleInput) -> Result<Vec<RangeInclusive<u64>>, SolveError> {
    input
        .raw()
        .split(',')
        .map(str::trim)
        .filter(|range| !range.is_empty())
        .map(parse_range)
        .collect::<anyhow::Result<_>>()
        .map_err(SolveError::failed)
}

fn parse_range(range: &str) -> anyhow::Result<RangeInclusive<u64>> {
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| anyhow!("expected START-END, found {:?}", range))?;
    let start = start.parse().with_context(|| format!("bad start in {:?}", range))?;
    let end = end.parse().with_context(|| format!("bad end in {:?}", range))?;
    Ok(start..=end)
}

fn sum_invalid(ranges: &[RangeInclusive<u64>], invalid: impl Fn(u64) -> bool) -> u64 {
    ranges
        .iter()
        .flat_map(|range| range.clone())
        .filter(|&id| invalid(id))
        .sum()
}

/// Whether `id` is one digit block repeated; `times` pins the repeat count
fn repeats(id: u64, times: Option<usize>) -> bool {
    let digits = id.to_string();
    let digits = digits.as_bytes();
    let len = digits.len();

    (1..=len / 2)
        .filter(|block| len % block == 0)
        .filter(|block| times.is_none_or(|times| len / block == times))
        .any(|block| digits.chunks(block).all(|chunk| chunk == &digits[..block]))
}
