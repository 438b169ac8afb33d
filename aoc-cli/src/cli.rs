//! CLI argument parsing using clap

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_RETRIES: u32 = 3;

/// Parallelization level for solution execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all puzzles sequentially in order
    Sequential,
    /// Parallelize across years; days and parts run sequentially within each year
    Year,
    /// Parallelize across year/day combinations; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all year/day/part combinations
    Part,
}

/// Advent of Code solution runner
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Run Advent of Code solutions", version)]
pub struct Args {
    /// Cache directory for puzzle inputs [env: AOC_CACHE_DIR] [default: ~/.cache/aoc/inputs]
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run solutions (today's puzzle during Advent, otherwise everything registered)
    Run(RunArgs),
    /// Delete cached puzzle inputs
    ClearCache(ClearCacheArgs),
    /// Generate placeholder solution files for a year
    Scaffold(ScaffoldArgs),
    /// Verify the configured session cookie
    Session,
}

impl Default for Command {
    fn default() -> Self {
        Command::Run(RunArgs::default())
    }
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Year to run (runs all years if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2015..2035))]
    pub year: Option<u16>,

    /// Day to run (runs all days of the year if omitted)
    #[arg(
        short,
        long,
        requires = "year",
        conflicts_with = "all",
        value_parser = clap::value_parser!(u8).range(1..=25)
    )]
    pub day: Option<u8>,

    /// Run every registered puzzle even during Advent
    #[arg(short, long)]
    pub all: bool,

    /// Run only this part; the other is reported as skipped
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,

    /// Never download inputs; uncached puzzles fail as input unavailable
    #[arg(long)]
    pub offline: bool,

    /// Timeout for a single input request (e.g. "30s", "1m")
    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    pub fetch_timeout: Duration,

    /// Delay before the first retry of a transient fetch failure
    #[arg(long, value_parser = humantime::parse_duration, default_value = "500ms")]
    pub retry_delay: Duration,

    /// Maximum number of attempts per input request
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            year: None,
            day: None,
            all: false,
            part: None,
            threads: None,
            parallelize_by: ParallelizeBy::default(),
            quiet: false,
            offline: false,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            retries: DEFAULT_RETRIES,
        }
    }
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ClearCacheArgs {
    /// Only clear this year
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2015..2035))]
    pub year: Option<u16>,

    /// Only clear this day (requires --year)
    #[arg(short, long, requires = "year", value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldArgs {
    /// Year to generate
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2015..2035))]
    pub year: u16,

    /// Solutions module directory that receives `year_<YEAR>/`
    #[arg(long, default_value = "aoc-solutions/src/my_solutions")]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("aoc").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_subcommand_means_run_with_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command.unwrap_or_default(), Command::default());

        let explicit = parse(&["run"]).unwrap();
        assert_eq!(explicit.command, Some(Command::Run(RunArgs::default())));
    }

    #[test]
    fn test_run_arguments() {
        let args = parse(&[
            "run",
            "--year",
            "2023",
            "--day",
            "7",
            "--parallelize-by",
            "part",
            "--fetch-timeout",
            "5s",
            "--offline",
        ])
        .unwrap();

        let Some(Command::Run(run)) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.year, Some(2023));
        assert_eq!(run.day, Some(7));
        assert_eq!(run.parallelize_by, ParallelizeBy::Part);
        assert_eq!(run.fetch_timeout, Duration::from_secs(5));
        assert!(run.offline);
    }

    #[test]
    fn test_part_selection() {
        let Some(Command::Run(run)) = parse(&["run", "--part", "2"]).unwrap().command else {
            panic!("expected run");
        };
        assert_eq!(run.part, Some(2));

        assert!(parse(&["run", "--part", "0"]).is_err());
        assert!(parse(&["run", "--part", "3"]).is_err());
    }

    #[test]
    fn test_day_requires_year() {
        assert!(parse(&["run", "--day", "3"]).is_err());
        assert!(parse(&["clear-cache", "--day", "3"]).is_err());
    }

    #[test]
    fn test_day_conflicts_with_all() {
        assert!(parse(&["run", "--year", "2020", "--day", "3", "--all"]).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(parse(&["run", "--year", "2014"]).is_err());
        assert!(parse(&["run", "--year", "2020", "--day", "26"]).is_err());
        assert!(parse(&["scaffold", "--year", "2035"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["clear-cache", "--cache-dir", "/tmp/aoc", "-vv"]).unwrap();
        assert_eq!(args.cache_dir, Some(PathBuf::from("/tmp/aoc")));
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Some(Command::ClearCache(ClearCacheArgs {
                year: None,
                day: None
            }))
        );
    }
}
