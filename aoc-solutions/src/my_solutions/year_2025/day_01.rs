use anyhow::{Context, anyhow, bail};
use aoc_puzzle::{AdventSolution, Answer, PuzzleInput, PuzzleSolution, SolveError};

const DIAL_SIZE: i32 = 100;
const START: i32 = 50;

#[derive(AdventSolution)]
#[advent(year = 2025, day = 1)]
pub struct Day01;

impl PuzzleSolution for Day01 {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(turn_dial(&parse(input)?).stops_at_zero.into())
    }

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(turn_dial(&parse(input)?).passes_zero.into())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DialCounts {
    stops_at_zero: u32,
    passes_zero: u32,
}

/// Rotations as signed click counts; left is negative
fn parse(input: &PuzzleInput) -> Result<Vec<i32>, SolveError> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, line)| parse_rotation(line).with_context(|| format!("line {}", idx + 1)))
        .collect::<anyhow::Result<_>>()
        .map_err(SolveError::failed)
}

fn parse_rotation(line: &str) -> anyhow::Result<i32> {
    let (direction, clicks) = line
        .split_at_checked(1)
        .ok_or_else(|| anyhow!("rotation is empty"))?;
    let clicks = i32::from(clicks.parse::<u16>()?);
    match direction {
        "L" => Ok(-clicks),
        "R" => Ok(clicks),
        other => bail!("direction must be 'L' or 'R', found {:?}", other),
    }
}

fn turn_dial(rotations: &[i32]) -> DialCounts {
    let (_, counts) = rotations
        .iter()
        .fold((START, DialCounts::default()), |(position, mut counts), &rotation| {
            counts.passes_zero += zero_clicks(position, rotation);
            let position = (position + rotation).rem_euclid(DIAL_SIZE);
            if position == 0 {
                counts.stops_at_zero += 1;
            }
            (position, counts)
        });
    counts
}

/// Clicks that land on 0 while turning from `position`
fn zero_clicks(position: i32, rotation: i32) -> u32 {
    let clicks = rotation.abs();
    let hits = if rotation >= 0 {
        (position + clicks) / DIAL_SIZE
    } else if position == 0 {
        clicks / DIAL_SIZE
    } else if clicks >= position {
        (clicks - position) / DIAL_SIZE + 1
    } else {
        0
    };
    hits.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_puzzle::PuzzleKey;
    use proptest::prelude::*;

    const EXAMPLE: &str = "L68\nL30\nR48\nL5\nR60\nL55\nL1\nL99\nR14\nL82\n";

    fn input(text: &str) -> PuzzleInput {
        PuzzleInput::inline(PuzzleKey::new(2025, 1).unwrap(), text)
    }

    #[test]
    fn test_example() {
        assert_eq!(Day01.part1(&input(EXAMPLE)).unwrap().as_str(), "3");
        assert_eq!(Day01.part2(&input(EXAMPLE)).unwrap().as_str(), "6");
    }

    #[test]
    fn test_full_turns_pass_zero_each_time() {
        assert_eq!(turn_dial(&[1000]).passes_zero, 10);
        assert_eq!(turn_dial(&[-50, -100]).passes_zero, 2);
    }

    #[test]
    fn test_bad_line_is_reported() {
        let err = Day01.part1(&input("L1\nX5\n")).unwrap_err();
        assert!(matches!(err, SolveError::Failed(_)));
        assert!(err.to_string().contains("line 2"));
    }

    proptest! {
        #[test]
        fn zero_clicks_matches_click_by_click(position in 0..DIAL_SIZE, rotation in -500i32..500) {
            let step = rotation.signum();
            let mut current = position;
            let mut expected = 0u32;
            for _ in 0..rotation.abs() {
                current = (current + step).rem_euclid(DIAL_SIZE);
                if current == 0 {
                    expected += 1;
                }
            }
            prop_assert_eq!(zero_clicks(position, rotation), expected);
        }
    }
}
