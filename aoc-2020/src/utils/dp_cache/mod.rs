//! Memoization cache for dynamic programming over a dependency graph
//!
//! Values are computed lazily: asking for an index first resolves the indices
//! it depends on, then computes and stores its own value. The cache is an
//! ordinary value owned by whoever asks, so two solver runs never share
//! entries.
//!
//! # Backends
//!
//! - [`VecBackend`]: dense `usize` indices starting at 0 (auto-growing)
//! - [`HashMapBackend`]: any `Hash + Eq` index
//!
//! # Cycles
//!
//! Indices currently being resolved are tracked; reaching one of them again
//! returns [`DpCacheError::Cycle`] instead of looping forever.
//!
//! # Example
//!
//! ```rust
//! use aoc_2020::utils::dp_cache::{DpCache, DpProblem, VecBackend};
//!
//! struct Fibonacci;
//!
//! impl DpProblem<usize, u64> for Fibonacci {
//!     fn deps(&self, n: &usize) -> Vec<usize> {
//!         if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
//!     }
//!     fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
//!         if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
//!     }
//! }
//!
//! let cache = DpCache::with_problem(VecBackend::new(), Fibonacci);
//! assert_eq!(cache.get(&10).unwrap(), 55);
//! ```
//!
//! Closures work too:
//!
//! ```rust
//! use aoc_2020::utils::dp_cache::{DpCache, HashMapBackend};
//!
//! let cache = DpCache::new(
//!     HashMapBackend::new(),
//!     |n: &u32| if *n == 0 { vec![] } else { vec![n - 1] },
//!     |n: &u32, deps: Vec<u64>| deps.first().map_or(1, |d| d * u64::from(*n)),
//! );
//! assert_eq!(cache.get(&5).unwrap(), 120);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, VecBackend};
pub use cache::{DpCache, DpCacheError};
pub use problem::{ClosureProblem, DpProblem};
