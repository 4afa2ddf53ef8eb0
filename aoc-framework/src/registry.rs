//! Day registry for managing and creating solver instances

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::instance::{DynSolver, SolverInstance};

// ============================================================================
// Storage Constants and Index Calculation
// ============================================================================

/// Puzzle year served by this registry
pub const YEAR: u16 = 2020;
/// Days per Advent of Code event (1-25)
pub const DAYS: usize = 25;

/// Calculate the flat slot index for a day, returning None if out of bounds
#[inline]
fn calc_index(day: u8) -> Option<usize> {
    if day == 0 || day as usize > DAYS {
        return None;
    }
    Some((day - 1) as usize)
}

/// Reconstruct the day from a flat slot index
#[inline]
fn from_index(index: usize) -> u8 {
    index as u8 + 1
}

// ============================================================================
// Factory Types
// ============================================================================

/// Factory function type for creating solver instances
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    /// The day number (1-25)
    pub day: u8,
    /// Number of parts this solver supports
    pub parts: u8,
    /// Tags attached at registration time
    pub tags: &'static [&'static str],
}

struct SolverFactoryEntry {
    factory: SolverFactory,
    parts: u8,
    tags: &'static [&'static str],
}

impl SolverFactoryEntry {
    fn info(&self, day: u8) -> FactoryInfo {
        FactoryInfo {
            day,
            parts: self.parts,
            tags: self.tags,
        }
    }
}

/// Builder for constructing a [`SolverRegistry`]
///
/// Registration is fallible: a day can only be claimed once, and only days
/// 1-25 exist.
///
/// # Example
///
/// ```
/// use aoc_framework::{AocParser, ParseError, RegistryBuilder, SolveError, Solver, SolverInstance};
///
/// struct Echo;
///
/// impl AocParser for Echo {
///     type SharedData<'a> = &'a str;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.trim())
///     }
/// }
///
/// impl Solver for Echo {
///     const PARTS: u8 = 1;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, _part: u8) -> Result<String, SolveError> {
///         Ok(shared.to_string())
///     }
/// }
///
/// let registry = RegistryBuilder::new()
///     .register(3, Echo::PARTS, |input: &str| {
///         Ok(Box::new(SolverInstance::<Echo>::new(3, input)?))
///     })
///     .unwrap()
///     .build();
///
/// let mut solver = registry.create_solver(3, " hi ").unwrap();
/// assert_eq!(solver.solve(1).unwrap().answer, "hi");
/// ```
pub struct RegistryBuilder {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder with one slot per day
    pub fn new() -> Self {
        Self {
            entries: (0..DAYS).map(|_| None).collect(),
        }
    }

    /// Register an untagged solver factory for a day
    pub fn register<F>(self, day: u8, parts: u8, factory: F) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        self.register_tagged(day, parts, &[], factory)
    }

    /// Register a solver factory with tags for a day
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with the solver registered, ready for chaining
    /// * `Err(RegistrationError)` - Day out of range or already registered
    pub fn register_tagged<F>(
        mut self,
        day: u8,
        parts: u8,
        tags: &'static [&'static str],
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        let index = calc_index(day).ok_or(RegistrationError::InvalidDay(day))?;
        if self.entries[index].is_some() {
            return Err(RegistrationError::DuplicateSolver(day));
        }

        log::debug!("registering day {day:02} ({parts} parts, tags {tags:?})");
        self.entries[index] = Some(SolverFactoryEntry {
            factory: Box::new(factory),
            parts,
            tags,
        });
        Ok(self)
    }

    /// Register all collected solver plugins
    ///
    /// Iterates through all plugins submitted via `inventory::submit!`
    /// (normally by `#[derive(AutoRegisterSolver)]`).
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register solver plugins that match the given filter predicate
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use aoc_framework::RegistryBuilder;
    /// // Only the search-heavy puzzles
    /// let registry = RegistryBuilder::new()
    ///     .register_solver_plugins(|plugin| plugin.tags.contains(&"search"))
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                self = plugin.solver.register_with(self, plugin.day, plugin.tags)?;
            }
        }
        Ok(self)
    }

    /// Finalize the builder and create an immutable registry
    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            entries: self.entries,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable registry mapping days to solver factories
pub struct SolverRegistry {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverRegistry {
    /// Iterate over metadata for all registered days, in day order
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_ref().map(|e| e.info(from_index(i))))
    }

    /// Get metadata for a specific day
    pub fn get_info(&self, day: u8) -> Option<FactoryInfo> {
        calc_index(day)
            .and_then(|i| self.entries.get(i)?.as_ref())
            .map(|e| e.info(day))
    }

    /// Check if a solver exists for the day
    pub fn contains(&self, day: u8) -> bool {
        self.get_info(day).is_some()
    }

    /// Get the number of registered days
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Check if no day is registered
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }

    /// Parse `input` with the day's loader and return a solver ready to run
    ///
    /// # Returns
    /// * `Ok(Box<dyn DynSolver>)` - Successfully created solver
    /// * `Err(SolverError)` - Day invalid or not registered, or parsing failed
    pub fn create_solver<'a>(
        &self,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        let index = calc_index(day).ok_or(SolverError::InvalidDay(day))?;
        let entry = self.entries[index]
            .as_ref()
            .ok_or(SolverError::NotFound(day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }
}

/// Type-erased hook that lets a solver register itself with a builder
///
/// Every [`Solver`](crate::Solver) gets this through a blanket impl, which is
/// what allows `&'static dyn RegisterableSolver` values inside [`SolverPlugin`].
pub trait RegisterableSolver: Sync {
    /// Register this solver type with the builder for a day
    fn register_with(
        &self,
        builder: RegistryBuilder,
        day: u8,
        tags: &'static [&'static str],
    ) -> Result<RegistryBuilder, RegistrationError>;

    /// Number of parts this solver supports
    fn parts(&self) -> u8;
}

impl<S> RegisterableSolver for S
where
    S: crate::solver::Solver + Sync + 'static,
{
    fn register_with(
        &self,
        builder: RegistryBuilder,
        day: u8,
        tags: &'static [&'static str],
    ) -> Result<RegistryBuilder, RegistrationError> {
        builder.register_tagged(day, S::PARTS, tags, move |input: &str| {
            Ok(Box::new(SolverInstance::<S>::new(day, input)?))
        })
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}

/// Plugin record for automatic solver registration
///
/// Normally produced by `#[derive(AutoRegisterSolver)]`; it can also be
/// submitted by hand:
///
/// ```no_run
/// use aoc_framework::{AocParser, ParseError, SolveError, Solver, SolverPlugin};
///
/// struct Day1Solver;
///
/// impl AocParser for Day1Solver {
///     type SharedData<'a> = ();
///
///     fn parse(_: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(())
///     }
/// }
///
/// impl Solver for Day1Solver {
///     const PARTS: u8 = 1;
///
///     fn solve_part(_: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         Err(SolveError::PartNotImplemented(part))
///     }
/// }
///
/// aoc_framework::inventory::submit! {
///     SolverPlugin {
///         day: 1,
///         solver: &Day1Solver,
///         tags: &["easy"],
///     }
/// }
/// ```
pub struct SolverPlugin {
    /// The day number (1-25)
    pub day: u8,
    /// The solver instance (type-erased)
    pub solver: &'static dyn RegisterableSolver,
    /// Tags for filtering (e.g. "simulation", "search")
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

/// Register a solver type with a builder variable, panicking on duplicates
///
/// ```
/// use aoc_framework::{AocParser, register_solver, ParseError, RegistryBuilder, SolveError, Solver};
///
/// struct MyDay1Solver;
///
/// impl AocParser for MyDay1Solver {
///     type SharedData<'a> = ();
///
///     fn parse(_: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(())
///     }
/// }
///
/// impl Solver for MyDay1Solver {
///     const PARTS: u8 = 1;
///
///     fn solve_part(_: &mut Self::SharedData<'_>, _: u8) -> Result<String, SolveError> {
///         Ok("done".to_string())
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// register_solver!(builder, MyDay1Solver, 1);
/// let registry = builder.build();
/// assert!(registry.contains(1));
/// ```
#[macro_export]
macro_rules! register_solver {
    ($builder:expr, $solver:ty, $day:expr) => {
        $builder = $builder
            .register(
                $day,
                <$solver as $crate::Solver>::PARTS,
                move |input: &str| {
                    Ok(::std::boxed::Box::new($crate::SolverInstance::<$solver>::new(
                        $day, input,
                    )?))
                },
            )
            .expect("Failed to register solver");
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AocParser, SolveError, Solver};

    struct Lines;

    impl AocParser for Lines {
        type SharedData<'a> = Vec<&'a str>;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            if input.is_empty() {
                return Err(ParseError::MissingData("empty".into()));
            }
            Ok(input.lines().collect())
        }
    }

    impl Solver for Lines {
        const PARTS: u8 = 2;

        fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
            match part {
                1 => Ok(shared.len().to_string()),
                2 => Ok(shared.concat()),
                _ => Err(SolveError::PartNotImplemented(part)),
            }
        }
    }

    fn with_day(day: u8) -> Result<RegistryBuilder, RegistrationError> {
        Lines.register_with(RegistryBuilder::new(), day, &["test"])
    }

    #[test]
    fn test_index_roundtrip() {
        for day in 1..=25u8 {
            assert_eq!(from_index(calc_index(day).unwrap()), day);
        }
        assert_eq!(calc_index(0), None);
        assert_eq!(calc_index(26), None);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let builder = with_day(7).unwrap();
        let result = Lines.register_with(builder, 7, &[]);
        assert!(matches!(result, Err(RegistrationError::DuplicateSolver(7))));
    }

    #[test]
    fn test_invalid_day_rejected() {
        assert!(matches!(with_day(0), Err(RegistrationError::InvalidDay(0))));
        assert!(matches!(with_day(26), Err(RegistrationError::InvalidDay(26))));
    }

    #[test]
    fn test_create_and_solve() {
        let registry = with_day(17).unwrap().build();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(17));

        let info = registry.get_info(17).unwrap();
        assert_eq!(info.parts, 2);
        assert_eq!(info.tags, &["test"]);

        let mut solver = registry.create_solver(17, "ab\ncd").unwrap();
        assert_eq!(solver.day(), 17);
        assert_eq!(solver.solve(1).unwrap().answer, "2");
        assert_eq!(solver.solve(2).unwrap().answer, "abcd");
        assert!(matches!(solver.solve(3), Err(SolveError::PartOutOfRange(3))));
    }

    #[test]
    fn test_lookup_errors() {
        let registry = RegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.create_solver(4, "x"),
            Err(SolverError::NotFound(4))
        ));
        assert!(matches!(
            registry.create_solver(30, "x"),
            Err(SolverError::InvalidDay(30))
        ));

        let registry = with_day(2).unwrap().build();
        assert!(matches!(
            registry.create_solver(2, ""),
            Err(SolverError::ParseError(ParseError::MissingData(_)))
        ));
    }

    #[test]
    fn test_iter_info_in_day_order() {
        let builder = with_day(22).unwrap();
        let builder = Lines.register_with(builder, 5, &[]).unwrap();
        let days: Vec<u8> = builder.build().iter_info().map(|i| i.day).collect();
        assert_eq!(days, vec![5, 22]);
    }
}
