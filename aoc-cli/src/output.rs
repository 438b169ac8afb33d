//! Output formatting for execution results

use crate::executor::{ExecutionResult, Outcome};
use std::time::{Duration, Instant};

/// Exit status when every selected part succeeded or was skipped
pub const EXIT_OK: u8 = 0;
/// Exit status when at least one part failed
pub const EXIT_FAILED: u8 = 1;
/// Exit status after a user interrupt
pub const EXIT_INTERRUPTED: u8 = 130;

/// Output formatter for execution results
pub struct OutputFormatter {
    quiet: bool,
    start_time: Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: Instant::now(),
        }
    }

    /// Format and print a single result
    pub fn print_result(&self, result: &ExecutionResult) {
        if self.quiet {
            self.print_quiet(result);
        } else {
            self.print_full(result);
        }
    }

    /// Print in quiet mode (just the answer)
    fn print_quiet(&self, result: &ExecutionResult) {
        match &result.outcome {
            Outcome::Success(answer) => println!("{}", answer),
            Outcome::Failed(failure) => eprintln!("{}: {}", prefix(result), failure),
            Outcome::Skipped(_) => {}
        }
    }

    /// Print full output with timing
    fn print_full(&self, result: &ExecutionResult) {
        match &result.outcome {
            Outcome::Success(answer) => println!(
                "{}: {} (solve: {})",
                prefix(result),
                answer,
                format_duration(result.elapsed)
            ),
            Outcome::Failed(failure) => eprintln!("{}: FAILED - {}", prefix(result), failure),
            Outcome::Skipped(reason) => println!("{}: skipped ({})", prefix(result), reason),
        }
    }

    /// Print a summary after all results
    /// Shows both total solve time (sum of durations) and actual elapsed wall-clock time
    pub fn print_summary(&self, results: &[ExecutionResult]) {
        if self.quiet {
            return;
        }

        let summary = Summary::of(results);
        let elapsed_time = self.start_time.elapsed();

        println!();
        println!("--- Summary ---");
        println!(
            "Parts: {} solved, {} failed, {} skipped",
            summary.solved, summary.failed, summary.skipped
        );
        println!("Total solve time: {}", format_duration(summary.solve_time));
        println!("Elapsed wall-clock time: {}", format_duration(elapsed_time));
        if !elapsed_time.is_zero() {
            let speedup = summary.solve_time.as_secs_f64() / elapsed_time.as_secs_f64();
            println!("Speedup factor: {:.2}x", speedup);
        }
    }
}

/// Counts over a finished run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub solved: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Sum of successful part durations
    pub solve_time: Duration,
}

impl Summary {
    pub fn of(results: &[ExecutionResult]) -> Self {
        results.iter().fold(Summary::default(), |mut acc, r| {
            match r.outcome {
                Outcome::Success(_) => {
                    acc.solved += 1;
                    acc.solve_time += r.elapsed;
                }
                Outcome::Failed(_) => acc.failed += 1,
                Outcome::Skipped(_) => acc.skipped += 1,
            }
            acc
        })
    }
}

/// Process exit status for a finished run
///
/// Skipped parts never affect the status.
pub fn exit_code(results: &[ExecutionResult], interrupted: bool) -> u8 {
    if interrupted {
        EXIT_INTERRUPTED
    } else if results.iter().any(|r| r.outcome.is_failed()) {
        EXIT_FAILED
    } else {
        EXIT_OK
    }
}

fn prefix(result: &ExecutionResult) -> String {
    format!("{} part {}", result.key, result.part)
}

/// Format a Duration for display
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{Failure, FailureKind};
    use aoc_puzzle::{Part, PuzzleKey};

    fn result(day: u8, part: Part, millis: u64, outcome: Outcome) -> ExecutionResult {
        ExecutionResult {
            key: PuzzleKey::new(2023, day).unwrap(),
            part,
            elapsed: Duration::from_millis(millis),
            outcome,
        }
    }

    fn failed() -> Outcome {
        Outcome::Failed(Failure {
            kind: FailureKind::InputUnavailable,
            reason: "input unavailable".to_string(),
            detail: None,
        })
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(999)), "999µs");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.50s");
    }

    #[test]
    fn test_prefix_is_zero_padded() {
        let r = result(7, Part::Two, 0, Outcome::Skipped("not implemented".to_string()));
        assert_eq!(prefix(&r), "2023/07 part 2");
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result(1, Part::One, 10, Outcome::Success("1".into())),
            result(1, Part::Two, 5, Outcome::Success("2".into())),
            result(2, Part::One, 0, failed()),
            result(3, Part::One, 0, Outcome::Skipped("not implemented".to_string())),
        ];
        assert_eq!(
            Summary::of(&results),
            Summary {
                solved: 2,
                failed: 1,
                skipped: 1,
                solve_time: Duration::from_millis(15),
            }
        );
    }

    #[test]
    fn test_exit_code() {
        let ok = result(1, Part::One, 1, Outcome::Success("1".into()));
        let skipped = result(1, Part::Two, 0, Outcome::Skipped("not implemented".to_string()));
        let bad = result(2, Part::One, 0, failed());

        assert_eq!(exit_code(&[], false), EXIT_OK);
        assert_eq!(exit_code(&[ok.clone(), skipped.clone()], false), EXIT_OK);
        assert_eq!(exit_code(&[ok.clone(), bad], false), EXIT_FAILED);
        assert_eq!(exit_code(&[ok, skipped], true), EXIT_INTERRUPTED);
    }
}
