//! Input cache for storing puzzle inputs locally

use crate::error::CacheError;
use aoc_http_client::FetchError;
use aoc_puzzle::{InputSource, PuzzleInput, PuzzleKey};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of puzzle inputs that are not cached yet
pub trait Upstream: Send + Sync {
    fn fetch(&self, key: PuzzleKey) -> Result<String, FetchError>;
}

impl<F> Upstream for F
where
    F: Fn(PuzzleKey) -> Result<String, FetchError> + Send + Sync,
{
    fn fetch(&self, key: PuzzleKey) -> Result<String, FetchError> {
        self(key)
    }
}

/// Path of the cache entry for `key`: `{root}/{year}/{day:02}.txt`
pub fn entry_path(root: &Path, key: PuzzleKey) -> PathBuf {
    root.join(key.year().to_string())
        .join(format!("{:02}.txt", key.day()))
}

fn is_entry_name(name: &str) -> bool {
    name.strip_suffix(".txt")
        .is_some_and(|day| day.len() == 2 && day.bytes().all(|b| b.is_ascii_digit()))
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// File-based cache for puzzle inputs
///
/// Directory structure: `{root}/{year}/{day:02}.txt`. An entry is only ever
/// created by renaming a fully written temporary file (`.{day:02}.*.tmp` in the
/// same directory) into place, so a file at the entry path is always complete.
pub struct InputCache<U> {
    root: PathBuf,
    upstream: U,
}

impl<U: Upstream> InputCache<U> {
    pub fn new(root: impl Into<PathBuf>, upstream: U) -> Self {
        Self {
            root: root.into(),
            upstream,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the cache path for a puzzle
    pub fn entry_path(&self, key: PuzzleKey) -> PathBuf {
        entry_path(&self.root, key)
    }

    /// Check if input is cached
    pub fn contains(&self, key: PuzzleKey) -> bool {
        self.entry_path(key).is_file()
    }

    /// Get the input for `key`, fetching and storing it on a miss
    ///
    /// Puzzles that have not been released yet fail with
    /// `FetchFailed(NotReleased)` without contacting upstream. Failed or empty
    /// fetches are never stored. Failing to store a good input is logged and
    /// the input is still returned.
    pub fn get(&self, key: PuzzleKey) -> Result<PuzzleInput, CacheError> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(%key, path = %path.display(), "input cache hit");
                let retrieved_at = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                return Ok(PuzzleInput::new(
                    key,
                    text,
                    InputSource::CacheHit,
                    retrieved_at,
                ));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if !key.is_released_at(Utc::now()) {
            debug!(%key, release = %key.release_time(), "puzzle not released yet");
            return Err(FetchError::NotReleased.into());
        }

        debug!(%key, "input cache miss, fetching");
        let text = self.upstream.fetch(key)?;
        if text.trim().is_empty() {
            return Err(FetchError::EmptyBody.into());
        }

        if let Err(e) = self.publish(key, &text) {
            warn!(%key, error = %e, "failed to write input cache entry");
        }

        Ok(PuzzleInput::new(key, text, InputSource::Fetched, Utc::now()))
    }

    /// Write `text` to a temporary file and atomically rename it into place
    fn publish(&self, key: PuzzleKey, text: &str) -> Result<PathBuf, CacheError> {
        self.publish_with(key, text, |_| Ok(()))
    }

    /// `publish`, calling `before_persist` with the fully written temporary file
    /// just before the rename
    fn publish_with(
        &self,
        key: PuzzleKey,
        text: &str,
        before_persist: impl FnOnce(&Path) -> io::Result<()>,
    ) -> Result<PathBuf, CacheError> {
        let path = self.entry_path(key);
        let dir = path
            .parent()
            .ok_or_else(|| CacheError::DirCreation(path.display().to_string()))?;

        fs::create_dir_all(dir).map_err(|e| {
            CacheError::DirCreation(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{:02}.", key.day()))
            .suffix(".tmp")
            .tempfile_in(dir)?;
        temp.write_all(text.as_bytes())?;
        temp.as_file().sync_all()?;
        before_persist(temp.path())?;
        temp.persist(&path).map_err(|e| e.error)?;

        debug!(%key, path = %path.display(), "stored input");
        Ok(path)
    }

    /// Delete the entry for `key` along with any leftover temporary files
    ///
    /// Returns the deleted paths; a missing entry is not an error.
    pub fn invalidate(&self, key: PuzzleKey) -> Result<Vec<PathBuf>, CacheError> {
        let entry = format!("{:02}.txt", key.day());
        let temp_prefix = format!(".{:02}.", key.day());
        let dir = self.root.join(key.year().to_string());

        let removed = remove_matching(&dir, |name| {
            name == entry || (name.starts_with(&temp_prefix) && is_temp_name(name))
        })?;
        info!(%key, removed = removed.len(), "invalidated cache entry");
        Ok(removed)
    }

    /// Delete every entry of a year
    pub fn invalidate_year(&self, year: u16) -> Result<Vec<PathBuf>, CacheError> {
        let dir = self.root.join(year.to_string());
        let removed = remove_matching(&dir, |name| is_entry_name(name) || is_temp_name(name))?;

        // Only succeeds if nothing else lives there
        let _ = fs::remove_dir(&dir);

        info!(year, removed = removed.len(), "invalidated cached year");
        Ok(removed)
    }

    /// Delete every entry in the cache
    pub fn invalidate_all(&self) -> Result<Vec<PathBuf>, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(year) = entry.file_name().to_str().and_then(|n| n.parse::<u16>().ok()) {
                years.push(year);
            }
        }
        years.sort_unstable();

        let mut removed = Vec::new();
        for year in years {
            removed.extend(self.invalidate_year(year)?);
        }
        Ok(removed)
    }
}

/// Remove files in `dir` whose name satisfies `matches`, sorted by path
fn remove_matching(
    dir: &Path,
    matches: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>, CacheError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !matches(name) || !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn key(year: u16, day: u8) -> PuzzleKey {
        PuzzleKey::new(year, day).unwrap()
    }

    /// Upstream that answers `{key}` and counts its calls
    fn counting() -> (
        Arc<AtomicUsize>,
        impl Fn(PuzzleKey) -> Result<String, FetchError> + Send + Sync,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let upstream = move |key: PuzzleKey| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(format!("input for {}\n", key))
        };
        (calls, upstream)
    }

    #[test]
    fn test_cache_path_format() {
        let root = Path::new("/cache");
        assert_eq!(
            entry_path(root, key(2024, 1)),
            PathBuf::from("/cache/2024/01.txt")
        );
        assert_eq!(
            entry_path(root, key(2023, 25)),
            PathBuf::from("/cache/2023/25.txt")
        );
    }

    #[test]
    fn test_second_get_is_a_cache_hit() {
        let temp = TempDir::new().unwrap();
        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);

        assert!(!cache.contains(key(2022, 3)));
        let first = cache.get(key(2022, 3)).unwrap();
        let second = cache.get(key(2022, 3)).unwrap();

        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.source(), InputSource::Fetched);
        assert_eq!(second.source(), InputSource::CacheHit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(key(2022, 3)));
    }

    #[test]
    fn test_invalidate_then_get_fetches_once() {
        let temp = TempDir::new().unwrap();
        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);

        cache.get(key(2021, 7)).unwrap();
        let removed = cache.invalidate(key(2021, 7)).unwrap();
        assert_eq!(removed, vec![cache.entry_path(key(2021, 7))]);

        cache.get(key(2021, 7)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Invalidating an entry that was never cached fetches exactly once too
        cache.invalidate(key(2021, 8)).unwrap();
        cache.get(key(2021, 8)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_invalidate_missing_entry_is_noop() {
        let temp = TempDir::new().unwrap();
        let (_, upstream) = counting();
        let cache = InputCache::new(temp.path().join("does-not-exist"), upstream);

        assert!(cache.invalidate(key(2020, 1)).unwrap().is_empty());
        assert!(cache.invalidate_year(2020).unwrap().is_empty());
        assert!(cache.invalidate_all().unwrap().is_empty());
    }

    #[test]
    fn test_panic_mid_fetch_leaves_no_entry() {
        let temp = TempDir::new().unwrap();
        let crashing = InputCache::new(temp.path(), |_key: PuzzleKey| -> Result<String, FetchError> {
            panic!("connection dropped mid-transfer")
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| crashing.get(key(2019, 4))));
        assert!(result.is_err());
        assert!(!crashing.contains(key(2019, 4)));

        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);
        let input = cache.get(key(2019, 4)).unwrap();
        assert_eq!(input.raw(), "input for 2019/04\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interrupted_publish_leaves_no_entry() {
        let temp = TempDir::new().unwrap();
        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);
        let day = key(2019, 5);
        let text = "input for 2019/05\n";

        // Written and synced, but stopped before the rename
        let result = cache.publish_with(day, text, |staged| {
            assert_eq!(fs::read_to_string(staged).unwrap(), text);
            Err(io::Error::new(ErrorKind::Interrupted, "stopped before rename"))
        });
        assert!(result.is_err());
        assert!(!cache.contains(day));
        assert!(!cache.entry_path(day).exists());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            cache.publish_with(day, text, |_: &Path| -> io::Result<()> {
                panic!("process killed before rename")
            })
        }));
        assert!(result.is_err());
        assert!(!cache.contains(day));

        let input = cache.get(day).unwrap();
        assert_eq!(input.raw(), text);
        assert_eq!(input.source(), InputSource::Fetched);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_leftover_temp_file_is_not_a_hit() {
        let temp = TempDir::new().unwrap();
        let year_dir = temp.path().join("2019");
        fs::create_dir_all(&year_dir).unwrap();
        let leftover = year_dir.join(".04.a1b2c3.tmp");
        fs::write(&leftover, "partial inp").unwrap();

        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);
        assert!(!cache.contains(key(2019, 4)));

        let input = cache.get(key(2019, 4)).unwrap();
        assert_eq!(input.raw(), "input for 2019/04\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Swept along with the entry
        let removed = cache.invalidate(key(2019, 4)).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!leftover.exists());
    }

    #[test]
    fn test_fetch_failure_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let cache = InputCache::new(temp.path(), |_key: PuzzleKey| -> Result<String, FetchError> {
            Err(FetchError::Unauthorized)
        });

        let err = cache.get(key(2018, 2)).unwrap_err();
        assert!(matches!(
            err,
            CacheError::FetchFailed(FetchError::Unauthorized)
        ));
        assert!(!cache.contains(key(2018, 2)));
    }

    #[test]
    fn test_empty_body_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let cache = InputCache::new(temp.path(), |_key: PuzzleKey| -> Result<String, FetchError> {
            Ok("  \n".to_string())
        });

        let err = cache.get(key(2018, 2)).unwrap_err();
        assert!(matches!(err, CacheError::FetchFailed(FetchError::EmptyBody)));
        assert!(!cache.contains(key(2018, 2)));
    }

    #[test]
    fn test_unreleased_puzzle_is_not_requested() {
        let temp = TempDir::new().unwrap();
        let (calls, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);

        let err = cache.get(key(2034, 25)).unwrap_err();
        assert!(matches!(err, CacheError::FetchFailed(FetchError::NotReleased)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalidate_year_and_all() {
        let temp = TempDir::new().unwrap();
        let (_, upstream) = counting();
        let cache = InputCache::new(temp.path(), upstream);

        for k in [key(2015, 1), key(2015, 2), key(2016, 1)] {
            cache.get(k).unwrap();
        }
        fs::write(temp.path().join("notes.md"), "keep me").unwrap();

        let removed = cache.invalidate_year(2015).unwrap();
        assert_eq!(
            removed,
            vec![cache.entry_path(key(2015, 1)), cache.entry_path(key(2015, 2))]
        );
        assert!(cache.contains(key(2016, 1)));

        let removed = cache.invalidate_all().unwrap();
        assert_eq!(removed, vec![cache.entry_path(key(2016, 1))]);
        assert!(temp.path().join("notes.md").exists());
    }
}
