//! Advent of Code 2020 solver framework
//!
//! Every puzzle is the same three-stage pipeline: a loader parses the input
//! text into a typed value, one solver per part turns that value into an
//! answer, and a reporter prints the answers. This crate provides the first
//! two stages' contracts and the plumbing that lets a runner treat all
//! puzzles uniformly.
//!
//! # Quick Example
//!
//! ```
//! use aoc_framework::{AocParser, ParseError, PartSolver, RegistryBuilder, SolveError, register_solver};
//! use aoc_framework::AocSolver;
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! pub struct Sums;
//!
//! impl AocParser for Sums {
//!     type SharedData<'a> = Vec<i64>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .enumerate()
//!             .map(|(idx, line)| line.parse().map_err(|e| ParseError::at_line(idx, e)))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i64>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().product::<i64>().to_string())
//!     }
//! }
//!
//! let mut builder = RegistryBuilder::new();
//! register_solver!(builder, Sums, 1);
//! let registry = builder.build();
//!
//! let mut solver = registry.create_solver(1, "2\n3\n4").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "9");
//! assert_eq!(solver.solve(2).unwrap().answer, "24");
//! ```
//!
//! # Key Concepts
//!
//! - [`AocParser`] is the loader: `SharedData` plus `parse()`.
//! - [`PartSolver<N>`] solves one part; `#[derive(AocSolver)]` generates the
//!   runtime [`Solver`] dispatch over them.
//! - [`DynSolver`] erases the solver type and records parse/solve timings.
//! - `#[derive(AutoRegisterSolver)]` with `#[aoc(day = N, tags = [...])]`
//!   submits a [`SolverPlugin`] that [`RegistryBuilder::register_all_plugins`]
//!   picks up.

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    DAYS, FactoryInfo, RegisterableSolver, RegistryBuilder, SolverFactory, SolverPlugin,
    SolverRegistry, YEAR,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-export inventory for use by the derive macro
pub use inventory;

pub use aoc_framework_macros::{AocSolver, AutoRegisterSolver};
