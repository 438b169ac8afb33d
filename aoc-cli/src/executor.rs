//! Parallel executor for running solutions

use crate::cache::{InputCache, Upstream};
use crate::cli::ParallelizeBy;
use crate::error::{ArcExecutorError, CacheError, ExecutorError};
use aoc_puzzle::{Answer, Part, PuzzleInput, PuzzleKey, PuzzleSolution, SolutionRegistry, SolveError};
use itertools::Itertools;
use rayon::prelude::*;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};
use tracing::debug;

/// Shared flag raised on user interrupt
///
/// Checked before each puzzle is started; running solutions are never stopped.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What went wrong with a failed part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The puzzle input could not be obtained
    InputUnavailable,
    /// The solution returned an error
    Solution,
    /// The solution panicked
    Panicked,
    /// The solution returned an empty answer
    InvalidAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
    pub detail: Option<String>,
}

impl Failure {
    fn input_unavailable(error: &CacheError) -> Self {
        Self {
            kind: FailureKind::InputUnavailable,
            reason: "input unavailable".to_string(),
            detail: Some(error.to_string()),
        }
    }

    /// Keeps every cause in the source chain, not only the first
    fn solution(error: &SolveError) -> Self {
        let reason = error.to_string();
        // Wrapped errors repeat their outermost message in the reason
        let causes: Vec<String> =
            std::iter::successors(std::error::Error::source(error), |cause| cause.source())
                .map(ToString::to_string)
                .filter(|message| !reason.contains(message.as_str()))
                .collect();

        Self {
            kind: FailureKind::Solution,
            reason,
            detail: (!causes.is_empty()).then(|| causes.join(": ")),
        }
    }

    fn panicked(payload: &(dyn Any + Send)) -> Self {
        Self {
            kind: FailureKind::Panicked,
            reason: "solution panicked".to_string(),
            detail: Some(panic_message(payload)),
        }
    }

    fn empty_answer() -> Self {
        Self {
            kind: FailureKind::InvalidAnswer,
            reason: "empty answer".to_string(),
            detail: None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.reason, detail),
            None => f.write_str(&self.reason),
        }
    }
}

/// Terminal state of one part execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Answer),
    Failed(Failure),
    Skipped(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }
}

/// Result from a single part execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub key: PuzzleKey,
    pub part: Part,
    /// Time spent inside the part function only
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl ExecutionResult {
    fn without_run(key: PuzzleKey, part: Part, outcome: Outcome) -> Self {
        Self {
            key,
            part,
            elapsed: Duration::ZERO,
            outcome,
        }
    }
}

/// Both results of one puzzle
#[derive(Debug, Clone)]
pub struct DayReport {
    pub key: PuzzleKey,
    pub part1: ExecutionResult,
    pub part2: ExecutionResult,
}

impl DayReport {
    fn uniform(key: PuzzleKey, outcome: Outcome) -> Self {
        Self {
            key,
            part1: ExecutionResult::without_run(key, Part::One, outcome.clone()),
            part2: ExecutionResult::without_run(key, Part::Two, outcome),
        }
    }

    pub fn results(&self) -> [&ExecutionResult; 2] {
        [&self.part1, &self.part2]
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    pub threads: usize,
    pub parallelize_by: ParallelizeBy,
    pub cancel: CancelFlag,
    /// Run only this part; the other is reported as skipped
    pub part: Option<Part>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            parallelize_by: ParallelizeBy::default(),
            cancel: CancelFlag::default(),
            part: None,
        }
    }
}

/// Parallel executor for running solutions
///
/// Every selected puzzle yields exactly two results. Unregistered puzzles are
/// skipped, input failures and solution failures are reported per part, and
/// nothing that happens inside one puzzle stops the others.
pub struct Executor<U> {
    registry: SolutionRegistry,
    cache: InputCache<U>,
    parallelize_by: ParallelizeBy,
    cancel: CancelFlag,
    part: Option<Part>,
    thread_pool: rayon::ThreadPool,
}

impl<U: Upstream> Executor<U> {
    pub fn new(
        registry: SolutionRegistry,
        cache: InputCache<U>,
        options: ExecutorOptions,
    ) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .thread_name(|index| format!("aoc-worker-{}", index))
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            registry,
            cache,
            parallelize_by: options.parallelize_by,
            cancel: options.cancel,
            part: options.part,
            thread_pool,
        })
    }

    pub fn registry(&self) -> &SolutionRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &InputCache<U> {
        &self.cache
    }

    /// Run both parts of one puzzle
    pub fn run(&self, key: PuzzleKey) -> DayReport {
        self.thread_pool.install(|| self.run_key(key))
    }

    /// Run every registered puzzle, reports sorted by key
    pub fn run_all(&self) -> Result<Vec<DayReport>, ArcExecutorError> {
        let keys: Vec<_> = self.registry.keys().collect();
        self.run_keys(&keys)
    }

    /// Run the given puzzles, reports sorted by key
    pub fn run_keys(&self, keys: &[PuzzleKey]) -> Result<Vec<DayReport>, ArcExecutorError> {
        let (tx, rx) = mpsc::channel();
        self.stream(keys, &tx)?;
        drop(tx);

        let mut results: Vec<ExecutionResult> = rx.into_iter().collect();
        results.sort_by_key(|r| (r.key, r.part));

        // Every key contributes exactly one result per part
        let mut results = results.into_iter();
        let mut reports = Vec::with_capacity(results.len() / 2);
        while let (Some(part1), Some(part2)) = (results.next(), results.next()) {
            reports.push(DayReport {
                key: part1.key,
                part1,
                part2,
            });
        }
        Ok(reports)
    }

    /// Run the given puzzles and send each part result as soon as it is known
    ///
    /// Completion order depends on the parallelization level; results are meant
    /// to be re-ordered by the receiver (see `ResultAggregator`). Duplicate keys
    /// are run once.
    pub fn stream(
        &self,
        keys: &[PuzzleKey],
        tx: &Sender<ExecutionResult>,
    ) -> Result<(), ArcExecutorError> {
        let keys: Vec<PuzzleKey> = keys.iter().copied().sorted().dedup().collect();

        match self.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for key in keys {
                    if let Err(e) = self.process(key, tx) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<PuzzleKey>> = keys
                    .into_iter()
                    .chunk_by(|key| key.year())
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.thread_pool.install(|| {
                    by_year
                        .into_par_iter()
                        .map(|keys| {
                            let mut err = None;
                            for key in keys {
                                if let Err(e) = self.process(key, tx) {
                                    err = Some(ArcExecutorError::combine_opt(err, e));
                                }
                            }
                            err
                        })
                        .reduce_with(ArcExecutorError::merge)
                        .flatten()
                        .map_or(Ok(()), Err)
                })
            }
            // Part additionally splits each puzzle in run_key
            ParallelizeBy::Day | ParallelizeBy::Part => self.thread_pool.install(|| {
                keys.into_par_iter()
                    .map(|key| self.process(key, tx).err())
                    .reduce_with(ArcExecutorError::merge)
                    .flatten()
                    .map_or(Ok(()), Err)
            }),
        }
    }

    /// Run one key (unless cancelled) and send both results
    fn process(&self, key: PuzzleKey, tx: &Sender<ExecutionResult>) -> Result<(), ArcExecutorError> {
        let report = if self.cancel.is_cancelled() {
            debug!(%key, "skipping after cancellation");
            DayReport::uniform(key, Outcome::Skipped("cancelled".to_string()))
        } else {
            self.run_key(key)
        };

        for result in [report.part1, report.part2] {
            tx.send(result)
                .map_err(|_| ArcExecutorError::from(ExecutorError::ChannelSend))?;
        }
        Ok(())
    }

    fn run_key(&self, key: PuzzleKey) -> DayReport {
        let Some(descriptor) = self.registry.lookup(key) else {
            debug!(%key, "no solution registered");
            return DayReport::uniform(key, Outcome::Skipped("not implemented".to_string()));
        };

        let input = match self.cache.get(key) {
            Ok(input) => input,
            Err(error) => {
                debug!(%key, %error, "input unavailable");
                return DayReport::uniform(key, Outcome::Failed(Failure::input_unavailable(&error)));
            }
        };

        let solution = descriptor.solution();
        let (part1, part2) = if self.parallelize_by == ParallelizeBy::Part {
            rayon::join(
                || self.solve_selected(key, Part::One, solution, &input),
                || self.solve_selected(key, Part::Two, solution, &input),
            )
        } else {
            (
                self.solve_selected(key, Part::One, solution, &input),
                self.solve_selected(key, Part::Two, solution, &input),
            )
        };

        DayReport { key, part1, part2 }
    }

    fn solve_selected(
        &self,
        key: PuzzleKey,
        part: Part,
        solution: &dyn PuzzleSolution,
        input: &PuzzleInput,
    ) -> ExecutionResult {
        match self.part {
            Some(selected) if selected != part => {
                ExecutionResult::without_run(key, part, Outcome::Skipped("not selected".to_string()))
            }
            _ => solve_part(key, part, solution, input),
        }
    }
}

/// Invoke one part, timing only the call and capturing errors and panics
fn solve_part(
    key: PuzzleKey,
    part: Part,
    solution: &dyn PuzzleSolution,
    input: &PuzzleInput,
) -> ExecutionResult {
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| solution.solve(part, input)));
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(Ok(answer)) if answer.is_blank() => Outcome::Failed(Failure::empty_answer()),
        Ok(Ok(answer)) => Outcome::Success(answer),
        Ok(Err(error)) => Outcome::Failed(Failure::solution(&error)),
        Err(payload) => Outcome::Failed(Failure::panicked(&*payload)),
    };
    debug!(%key, %part, ?elapsed, "part finished");

    ExecutionResult {
        key,
        part,
        elapsed,
        outcome,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
