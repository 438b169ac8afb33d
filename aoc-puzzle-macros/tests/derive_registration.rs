//! Registration through `#[derive(AdventSolution)]`

use aoc_puzzle::{
    AdventSolution, Answer, Part, PuzzleInput, PuzzleKey, PuzzleSolution, SolutionRegistry,
    SolveError,
};

#[derive(AdventSolution)]
#[advent(year = 2019)]
pub struct Day07;

impl PuzzleSolution for Day07 {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(input.lines().count().into())
    }

    fn part2(&self, _input: &PuzzleInput) -> Result<Answer, SolveError> {
        Err(SolveError::NotImplemented(Part::Two))
    }
}

#[derive(AdventSolution)]
#[advent(year = 2019, day = 8)]
pub struct Checksum;

impl PuzzleSolution for Checksum {
    fn part1(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(input.numbers().iter().sum::<i64>().into())
    }

    fn part2(&self, input: &PuzzleInput) -> Result<Answer, SolveError> {
        Ok(input.numbers().len().into())
    }
}

fn key(year: u16, day: u8) -> PuzzleKey {
    PuzzleKey::new(year, day).unwrap()
}

#[test]
fn test_derived_solutions_are_registered() {
    let registry = SolutionRegistry::build().unwrap();

    let keys: Vec<_> = registry.keys().collect();
    assert_eq!(keys, vec![key(2019, 7), key(2019, 8)]);
}

#[test]
fn test_day_is_inferred_from_type_name() {
    let registry = SolutionRegistry::build().unwrap();
    let descriptor = registry.lookup(key(2019, 7)).unwrap();
    assert!(descriptor.name().ends_with("::Day07"));
}

#[test]
fn test_registered_solution_dispatches() {
    let registry = SolutionRegistry::build().unwrap();
    let descriptor = registry.lookup(key(2019, 8)).unwrap();
    assert!(descriptor.name().ends_with("::Checksum"));

    let input = PuzzleInput::inline(key(2019, 8), "1 2\n3\n");
    let solution = descriptor.solution();
    assert_eq!(solution.solve(Part::One, &input).unwrap().as_str(), "6");
    assert_eq!(solution.solve(Part::Two, &input).unwrap().as_str(), "3");
}

#[test]
fn test_unregistered_day_is_not_found() {
    let registry = SolutionRegistry::build().unwrap();
    assert!(registry.lookup(key(2019, 9)).is_none());
}
