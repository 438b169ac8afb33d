//! Placeholder solution generator for a new year

use aoc_puzzle::{DAYS_PER_YEAR, PuzzleKey};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files touched by a scaffold run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    /// Existing files left untouched
    pub skipped: Vec<PathBuf>,
    /// Parent module that received the `pub mod year_<YEAR>;` line, if any
    pub registered_in: Option<PathBuf>,
}

/// Write `year_<YEAR>/mod.rs` and one placeholder per day under `dir`
///
/// Existing files are never overwritten, so running twice is harmless.
pub fn scaffold_year(dir: &Path, year: u16) -> io::Result<ScaffoldReport> {
    if let Err(e) = PuzzleKey::days_of(year) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
    }

    let year_dir = dir.join(format!("year_{}", year));
    fs::create_dir_all(&year_dir)?;

    let mut report = ScaffoldReport::default();

    let modules: String = (1..=DAYS_PER_YEAR)
        .map(|day| format!("pub mod day_{:02};\n", day))
        .collect();
    let year_module = year_dir.join("mod.rs");
    write_new(&year_module, &modules, &mut report)?;

    for day in 1..=DAYS_PER_YEAR {
        let path = year_dir.join(format!("day_{:02}.rs", day));
        // A pre-existing year module may list only some of the days
        if write_new(&path, &day_template(year, day), &mut report)? {
            add_module_line(&year_module, &format!("pub mod day_{:02};", day))?;
        }
    }

    let parent = dir.join("mod.rs");
    if add_module_line(&parent, &format!("pub mod year_{};", year))? {
        report.registered_in = Some(parent);
    }

    info!(year, created = report.created.len(), skipped = report.skipped.len(), "scaffolded");
    Ok(report)
}

fn day_template(year: u16, day: u8) -> String {
    format!(
        "use aoc_puzzle::{{AdventSolution, Answer, Part, PuzzleInput, PuzzleSolution, SolveError}};

#[derive(AdventSolution)]
#[advent(year = {year}, day = {day})]
pub struct Day{day:02};

impl PuzzleSolution for Day{day:02} {{
    fn part1(&self, _input: &PuzzleInput) -> Result<Answer, SolveError> {{
        Err(SolveError::NotImplemented(Part::One))
    }}

    fn part2(&self, _input: &PuzzleInput) -> Result<Answer, SolveError> {{
        Err(SolveError::NotImplemented(Part::Two))
    }}
}}
"
    )
}

/// Create `path` only if absent; true if it was written
fn write_new(path: &Path, contents: &str, report: &mut ScaffoldReport) -> io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(contents.as_bytes())?;
            report.created.push(path.to_path_buf());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "keeping existing file");
            report.skipped.push(path.to_path_buf());
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Append `line` to the module file unless already present; true if appended
fn add_module_line(path: &Path, line: &str) -> io::Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{}", line)?;
    Ok(true)
}
