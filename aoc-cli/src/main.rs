//! AOC CLI - Command-line interface for running Advent of Code solutions

mod aggregator;
mod cache;
mod cli;
mod config;
mod error;
mod executor;
mod interrupt;
mod logging;
mod output;
mod scaffold;
mod upstream;

// Import aoc-solutions to link the solution plugins
use aoc_solutions as _;

use aggregator::{ResultAggregator, ResultKey};
use aoc_puzzle::{PuzzleKey, SolutionRegistry};
use cache::InputCache;
use clap::Parser;
use cli::{Args, ClearCacheArgs, Command, RunArgs, ScaffoldArgs};
use config::Config;
use error::{ArcExecutorError, CliError};
use executor::{CancelFlag, Executor, ExecutorOptions};
use output::{EXIT_OK, OutputFormatter};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use tracing::{info, warn};
use upstream::AocUpstream;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<u8, CliError> {
    match args.command.unwrap_or_default() {
        Command::Run(run_args) => run_puzzles(args.cache_dir, run_args),
        Command::ClearCache(clear_args) => clear_cache(args.cache_dir, clear_args),
        Command::Scaffold(scaffold_args) => scaffold(scaffold_args),
        Command::Session => check_session(),
    }
}

fn run_puzzles(cache_dir: Option<PathBuf>, run_args: RunArgs) -> Result<u8, CliError> {
    let Config {
        selection,
        part,
        cache_dir,
        thread_count,
        parallelize_by,
        session,
        offline,
        quiet,
        fetch_timeout,
        retry,
    } = Config::from_args(cache_dir, run_args)?;

    // Duplicate declarations fail here, before anything runs
    let registry = SolutionRegistry::build()?;
    let keys = selection.keys(&registry);
    if keys.is_empty() {
        eprintln!("No solutions registered for the selected puzzles.");
        return Ok(EXIT_OK);
    }

    // Check for missing inputs early
    let missing: Vec<PuzzleKey> = keys
        .iter()
        .copied()
        .filter(|&key| registry.contains(key) && !cache::entry_path(&cache_dir, key).is_file())
        .collect();
    if !missing.is_empty() && !quiet {
        eprintln!("Missing {} input file(s):", missing.len());
        for key in &missing {
            eprintln!("  - {}", key);
        }
    }

    let upstream = if offline {
        AocUpstream::offline()
    } else {
        let client = config::build_client(fetch_timeout)?;
        let session = if !missing.is_empty() && session.is_empty() && std::io::stdin().is_terminal() {
            let session = config::prompt_session(
                "Session token required to fetch missing inputs from adventofcode.com",
            )?;
            let user_id = config::verify_session(&client, &session)?;
            info!(user_id, "session verified");
            session
        } else {
            session
        };
        AocUpstream::new(client, session, retry)
    };

    let cancel = CancelFlag::new();
    if let Err(e) = interrupt::install(cancel.clone()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let executor = Executor::new(
        registry,
        InputCache::new(cache_dir, upstream),
        ExecutorOptions {
            threads: thread_count,
            parallelize_by,
            cancel: cancel.clone(),
            part,
        },
    )
    .map_err(ArcExecutorError::from)?;

    if !quiet {
        eprintln!("Running {} puzzle(s)...", keys.len());
    }

    let formatter = OutputFormatter::new(quiet);
    let results = stream_results(&executor, &keys, &formatter)?;
    formatter.print_summary(&results);

    Ok(output::exit_code(&results, cancel.is_cancelled()))
}

/// Run the executor on a worker thread and print results in key order as they arrive
fn stream_results(
    executor: &Executor<AocUpstream>,
    keys: &[PuzzleKey],
    formatter: &OutputFormatter,
) -> Result<Vec<executor::ExecutionResult>, CliError> {
    let mut aggregator = ResultAggregator::new(ResultKey::for_puzzles(keys));
    let mut results = Vec::with_capacity(keys.len() * 2);
    let (tx, rx) = mpsc::channel();

    let streamed = thread::scope(|scope| {
        let handle = scope.spawn(move || executor.stream(keys, &tx));

        for result in &rx {
            for ready in aggregator.add(result) {
                formatter.print_result(&ready);
                results.push(ready);
            }
        }

        handle.join()
    });

    // Only non-empty if a result arrived for an unexpected key
    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }
    if !aggregator.is_complete() {
        warn!("not all expected results were received");
    }

    streamed.map_err(|_| CliError::Config("Executor thread panicked".to_string()))??;
    Ok(results)
}

fn clear_cache(cache_dir: Option<PathBuf>, args: ClearCacheArgs) -> Result<u8, CliError> {
    let root = config::resolve_cache_dir(cache_dir, |name| std::env::var(name).ok());
    let cache = InputCache::new(root, AocUpstream::offline());

    let deleted = match (args.year, args.day) {
        (Some(year), Some(day)) => cache.invalidate(PuzzleKey::new(year, day)?)?,
        (Some(year), None) => cache.invalidate_year(year)?,
        (None, _) => cache.invalidate_all()?,
    };

    if deleted.is_empty() {
        println!("Nothing to delete in {}", cache.root().display());
    }
    for path in &deleted {
        println!("Deleted {}", path.display());
    }
    Ok(EXIT_OK)
}

fn scaffold(args: ScaffoldArgs) -> Result<u8, CliError> {
    let report = scaffold::scaffold_year(&args.dir, args.year)?;

    for path in &report.created {
        println!("Created {}", path.display());
    }
    for path in &report.skipped {
        println!("Kept existing {}", path.display());
    }
    if let Some(parent) = &report.registered_in {
        println!("Registered year_{} in {}", args.year, parent.display());
    }
    Ok(EXIT_OK)
}

fn check_session() -> Result<u8, CliError> {
    let session = config::session_from_env(|name| std::env::var(name).ok());
    let session = if session.is_empty() {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::Config(format!(
                "No session configured; set {}",
                config::SESSION_VARS[0]
            )));
        }
        config::prompt_session("No session found in the environment")?
    } else {
        session
    };

    let client = config::build_client(RunArgs::default().fetch_timeout)?;
    let user_id = config::verify_session(&client, &session)?;
    println!("Session is valid for user {}", user_id);
    Ok(EXIT_OK)
}
