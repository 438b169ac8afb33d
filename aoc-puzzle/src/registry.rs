//! Solution registry mapping puzzle keys to solution implementations

use crate::error::RegistrationError;
use crate::key::{CAPACITY, PuzzleKey};
use crate::solution::{FnSolution, PartFn, PuzzleSolution};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Registered binding from a puzzle key to its solution
pub struct SolutionDescriptor {
    key: PuzzleKey,
    name: Cow<'static, str>,
    solution: Box<dyn PuzzleSolution>,
}

impl SolutionDescriptor {
    pub fn key(&self) -> PuzzleKey {
        self.key
    }

    /// Name of the declaration that provided the solution
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solution(&self) -> &dyn PuzzleSolution {
        &*self.solution
    }
}

impl fmt::Debug for SolutionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Plugin information for automatic solution registration
///
/// Submitted into an `inventory` collection by `#[derive(AdventSolution)]`, or by
/// hand:
///
/// ```ignore
/// use aoc_puzzle::{Answer, Part, PuzzleInput, PuzzleSolution, SolutionPlugin, SolveError};
///
/// struct Day3;
///
/// impl PuzzleSolution for Day3 {
///     fn part1(&self, _: &PuzzleInput) -> Result<Answer, SolveError> {
///         Err(SolveError::NotImplemented(Part::One))
///     }
///     fn part2(&self, _: &PuzzleInput) -> Result<Answer, SolveError> {
///         Err(SolveError::NotImplemented(Part::Two))
///     }
/// }
///
/// aoc_puzzle::inventory::submit! {
///     SolutionPlugin {
///         year: 2023,
///         day: 3,
///         name: "Day3",
///         solution: &Day3,
///     }
/// }
/// ```
pub struct SolutionPlugin {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// Fully qualified name of the declaring type
    pub name: &'static str,
    /// The solution instance (type-erased)
    pub solution: &'static dyn PuzzleSolution,
}

inventory::collect!(SolutionPlugin);

/// Builder for constructing a [`SolutionRegistry`]
///
/// Rejects a second registration for the same puzzle, naming both declarations.
///
/// # Example
///
/// ```
/// use aoc_puzzle::{Answer, PuzzleInput, PuzzleKey, RegistryBuilder, SolveError};
///
/// fn length(input: &PuzzleInput) -> Result<Answer, SolveError> {
///     Ok(input.raw().len().into())
/// }
///
/// let key = PuzzleKey::new(2023, 1).unwrap();
/// let registry = RegistryBuilder::new()
///     .register_fns(key, "length", length, length)
///     .unwrap()
///     .build();
///
/// assert!(registry.lookup(key).is_some());
/// assert!(registry.lookup(PuzzleKey::new(2023, 2).unwrap()).is_none());
///
/// let again = RegistryBuilder::new()
///     .register_fns(key, "first", length, length)
///     .unwrap()
///     .register_fns(key, "second", length, length);
/// assert!(again.is_err());
/// ```
pub struct RegistryBuilder {
    entries: Vec<Option<SolutionDescriptor>>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder with pre-allocated storage
    pub fn new() -> Self {
        Self {
            entries: (0..CAPACITY).map(|_| None).collect(),
        }
    }

    /// Register a solution for a puzzle
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with the solution registered, ready for chaining
    /// * `Err(RegistrationError::Conflict)` - The puzzle already has a solution
    pub fn register<S>(
        mut self,
        key: PuzzleKey,
        name: impl Into<Cow<'static, str>>,
        solution: S,
    ) -> Result<Self, RegistrationError>
    where
        S: PuzzleSolution + 'static,
    {
        let name = name.into();
        let slot = &mut self.entries[key.index()];

        if let Some(existing) = slot {
            return Err(RegistrationError::Conflict {
                key,
                existing: existing.name.to_string(),
                duplicate: name.into_owned(),
            });
        }

        debug!(%key, name = %name, "registered solution");
        *slot = Some(SolutionDescriptor {
            key,
            name,
            solution: Box::new(solution),
        });
        Ok(self)
    }

    /// Register a solution given as a pair of part functions
    pub fn register_fns(
        self,
        key: PuzzleKey,
        name: impl Into<Cow<'static, str>>,
        part1: PartFn,
        part2: PartFn,
    ) -> Result<Self, RegistrationError> {
        self.register(key, name, FnSolution { part1, part2 })
    }

    /// Register a single collected plugin
    pub fn register_plugin(self, plugin: &SolutionPlugin) -> Result<Self, RegistrationError> {
        let key = PuzzleKey::new(plugin.year, plugin.day).map_err(|source| {
            RegistrationError::InvalidKey {
                name: plugin.name.to_string(),
                source,
            }
        })?;
        self.register(key, plugin.name, plugin.solution)
    }

    /// Register all collected solution plugins
    ///
    /// Iterates through all plugins submitted via `inventory::submit!` (usually
    /// through `#[derive(AdventSolution)]`) and registers each one.
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_plugins(|_| true)
    }

    /// Register the collected plugins for which `filter` returns `true`
    ///
    /// ```no_run
    /// # use aoc_puzzle::RegistryBuilder;
    /// // Register only 2023 solutions
    /// let registry = RegistryBuilder::new()
    ///     .register_plugins(|plugin| plugin.year == 2023)
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolutionPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolutionPlugin>() {
            if filter(plugin) {
                self = self.register_plugin(plugin)?;
            }
        }
        Ok(self)
    }

    /// Finalize the builder into an immutable registry
    pub fn build(self) -> SolutionRegistry {
        SolutionRegistry {
            entries: self.entries,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable index from puzzle key to solution
///
/// Built once, eagerly, at process start. Storage is a flat slot table indexed by
/// (year, day), so iteration is always in key order.
pub struct SolutionRegistry {
    entries: Vec<Option<SolutionDescriptor>>,
}

impl SolutionRegistry {
    /// Build a registry from every linked `#[derive(AdventSolution)]` declaration
    ///
    /// Fails with [`RegistrationError::Conflict`] if two declarations claim the same
    /// puzzle; no partial registry is returned.
    pub fn build() -> Result<Self, RegistrationError> {
        Ok(RegistryBuilder::new().register_all_plugins()?.build())
    }

    /// Look up the solution for a puzzle
    ///
    /// `None` is the normal answer for a day that has not been implemented.
    pub fn lookup(&self, key: PuzzleKey) -> Option<&SolutionDescriptor> {
        self.entries.get(key.index())?.as_ref()
    }

    /// Whether a solution is registered for `key`
    pub fn contains(&self, key: PuzzleKey) -> bool {
        self.lookup(key).is_some()
    }

    /// All registered keys sorted by (year, day)
    ///
    /// Each call starts a fresh iteration.
    pub fn keys(&self) -> impl Iterator<Item = PuzzleKey> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_some())
            .map(|(index, _)| PuzzleKey::from_index(index))
    }

    /// All descriptors in key order
    pub fn descriptors(&self) -> impl Iterator<Item = &SolutionDescriptor> + '_ {
        self.entries.iter().flatten()
    }

    /// Number of registered solutions
    pub fn len(&self) -> usize {
        self.descriptors().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }
}

impl fmt::Debug for SolutionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptors()).finish()
    }
}
