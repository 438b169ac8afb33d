//! Configuration resolution from CLI args and environment

use crate::cli::{ParallelizeBy, RunArgs};
use crate::error::CliError;
use aoc_http_client::{AocClient, RetryPolicy};
use aoc_puzzle::{Part, PuzzleKey, SolutionRegistry};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

/// Environment variables holding the session cookie, in lookup order
pub const SESSION_VARS: [&str; 2] = ["AOC_SESSION", "AOC_SESSION_COOKIE"];
pub const CACHE_DIR_VAR: &str = "AOC_CACHE_DIR";
pub const DEFAULT_CACHE_DIR: &str = "~/.cache/aoc/inputs";

/// Which puzzles a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    One(PuzzleKey),
    Year(u16),
    All,
}

impl Selection {
    /// Resolve the year/day flags at `now`
    ///
    /// Without flags, today's puzzle is selected during Advent (Dec 1-25,
    /// US-Eastern), everything otherwise.
    pub fn resolve(
        year: Option<u16>,
        day: Option<u8>,
        all: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, CliError> {
        Ok(match (year, day) {
            (Some(year), Some(day)) => Selection::One(PuzzleKey::new(year, day)?),
            (Some(year), None) => match PuzzleKey::days_of(year) {
                Ok(_) => Selection::Year(year),
                Err(e) => return Err(e.into()),
            },
            (None, Some(_)) => {
                return Err(CliError::Config("--day requires --year".to_string()));
            }
            (None, None) if all => Selection::All,
            (None, None) => PuzzleKey::today(now).map_or(Selection::All, Selection::One),
        })
    }

    /// Keys to run, in order
    ///
    /// A single explicit key is kept even if unregistered so it is reported as
    /// skipped rather than silently ignored.
    pub fn keys(&self, registry: &SolutionRegistry) -> Vec<PuzzleKey> {
        match *self {
            Selection::One(key) => vec![key],
            Selection::Year(year) => registry.keys().filter(|k| k.year() == year).collect(),
            Selection::All => registry.keys().collect(),
        }
    }
}

/// Resolved runtime configuration for `aoc run`
pub struct Config {
    pub selection: Selection,
    /// Only this part is run when set
    pub part: Option<Part>,
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Number of threads for parallel execution
    pub thread_count: usize,
    /// Parallelization level
    pub parallelize_by: ParallelizeBy,
    /// Session key (zeroized on drop); empty when not configured
    pub session: Zeroizing<String>,
    pub offline: bool,
    /// Quiet mode
    pub quiet: bool,
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Build config from run args, with the environment as fallback
    pub fn from_args(cache_dir: Option<PathBuf>, args: RunArgs) -> Result<Self, CliError> {
        Self::from_args_with(cache_dir, args, |name| std::env::var(name).ok(), Utc::now())
    }

    fn from_args_with(
        cache_dir: Option<PathBuf>,
        args: RunArgs,
        env: impl Fn(&str) -> Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CliError> {
        let selection = Selection::resolve(args.year, args.day, args.all, now)?;
        let part = args
            .part
            .map(|n| {
                Part::from_number(n)
                    .ok_or_else(|| CliError::Config(format!("there is no part {}", n)))
            })
            .transpose()?;
        let retry = RetryPolicy {
            max_attempts: args.retries.max(1),
            base_delay: args.retry_delay,
            ..RetryPolicy::default()
        };

        Ok(Config {
            selection,
            part,
            cache_dir: resolve_cache_dir(cache_dir, &env),
            thread_count: args.threads.unwrap_or_else(num_cpus).max(1),
            parallelize_by: args.parallelize_by,
            session: session_from_env(&env),
            offline: args.offline,
            quiet: args.quiet,
            fetch_timeout: args.fetch_timeout,
            retry,
        })
    }
}

/// Cache directory from the flag, then `AOC_CACHE_DIR`, then the default
pub fn resolve_cache_dir(flag: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    let path = flag
        .or_else(|| env(CACHE_DIR_VAR).filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    expand_tilde(&path)
}

/// First non-empty session variable, trimmed
pub fn session_from_env(env: impl Fn(&str) -> Option<String>) -> Zeroizing<String> {
    SESSION_VARS
        .iter()
        .filter_map(|name| env(name))
        .map(|value| Zeroizing::new(value.trim().to_string()))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && let Some(rest) = path_str.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/'))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches('/'));
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// HTTP client with the configured request timeout
pub fn build_client(timeout: Duration) -> Result<AocClient, CliError> {
    let builder = reqwest::blocking::Client::builder()
        .use_rustls_tls()
        .timeout(timeout);
    Ok(AocClient::builder().client_builder(builder).build()?)
}

/// Prompt user for session token
pub fn prompt_session(reason: &str) -> Result<Zeroizing<String>, CliError> {
    eprintln!("{}", reason);
    let s = rpassword::prompt_password("Enter AOC session key: ")
        .map_err(|e| CliError::Config(format!("Failed to read session: {}", e)))?;
    let s = Zeroizing::new(s.trim().to_string());
    if s.is_empty() {
        return Err(CliError::Config("Session token is required.".to_string()));
    }
    Ok(s)
}

/// Verify a session and return the user ID it belongs to
pub fn verify_session(client: &AocClient, session: &str) -> Result<u64, CliError> {
    let info = client.verify_session(session)?;
    info.user_id
        .ok_or_else(|| CliError::Config("Invalid session: could not fetch user ID".to_string()))
}
