//! Single-threaded DP cache implementation.

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;

use thiserror::Error;

use super::backend::Backend;
use super::problem::{ClosureProblem, DpProblem};

/// Error returned by [`DpCache::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DpCacheError {
    /// An index (transitively) depends on itself
    #[error("dependency cycle detected")]
    Cycle,
}

/// An index waiting on its dependencies: `values` holds the resolved prefix
/// of `deps`.
struct Frame<I, K> {
    index: I,
    deps: Vec<I>,
    values: Vec<K>,
}

/// A memoization cache with lazy dependency resolution.
///
/// Each index is computed at most once. The backend sits in a `RefCell` so
/// `get` can take `&self`.
///
/// # Example
///
/// ```rust
/// use aoc_2020::utils::dp_cache::{DpCache, DpProblem, VecBackend};
///
/// struct Factorial;
///
/// impl DpProblem<usize, u64> for Factorial {
///     fn deps(&self, n: &usize) -> Vec<usize> {
///         if *n == 0 { vec![] } else { vec![n - 1] }
///     }
///     fn compute(&self, n: &usize, deps: Vec<u64>) -> u64 {
///         if *n == 0 { 1 } else { (*n as u64) * deps[0] }
///     }
/// }
///
/// let cache = DpCache::with_problem(VecBackend::new(), Factorial);
/// assert_eq!(cache.get(&5).unwrap(), 120);
/// ```
pub struct DpCache<I, K, B, P>
where
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    backend: RefCell<B>,
    problem: P,
    _phantom: PhantomData<(I, K)>,
}

impl<I, K, B, P> DpCache<I, K, B, P>
where
    I: Clone + Hash + Eq,
    K: Clone,
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    /// Creates a new DpCache with the given backend and problem definition.
    pub fn with_problem(backend: B, problem: P) -> Self {
        Self {
            backend: RefCell::new(backend),
            problem,
            _phantom: PhantomData,
        }
    }

    /// Retrieves the value for the given index, computing it if necessary.
    ///
    /// Dependencies are resolved depth-first on an explicit stack of
    /// frames, so long chains cost heap memory rather than call depth.
    ///
    /// # Errors
    ///
    /// [`DpCacheError::Cycle`] if resolving `index` leads back to an index
    /// that is still being resolved.
    pub fn get(&self, index: &I) -> Result<K, DpCacheError> {
        if let Some(value) = self.backend.borrow().get(index) {
            return Ok(value.clone());
        }

        let mut resolving = HashSet::from([index.clone()]);
        let mut current = self.frame(index.clone());
        let mut parents: Vec<Frame<I, K>> = Vec::new();
        loop {
            match current.deps.get(current.values.len()).cloned() {
                Some(dep) => {
                    let cached = self.backend.borrow().get(&dep).cloned();
                    match cached {
                        Some(value) => current.values.push(value),
                        None => {
                            if !resolving.insert(dep.clone()) {
                                return Err(DpCacheError::Cycle);
                            }
                            let child = self.frame(dep);
                            parents.push(std::mem::replace(&mut current, child));
                        }
                    }
                }
                None => {
                    let Frame { index, values, .. } = current;
                    let value = self.problem.compute(&index, values);
                    resolving.remove(&index);
                    self.backend.borrow_mut().insert(index, value.clone());
                    match parents.pop() {
                        Some(mut parent) => {
                            parent.values.push(value);
                            current = parent;
                        }
                        None => return Ok(value),
                    }
                }
            }
        }
    }

    fn frame(&self, index: I) -> Frame<I, K> {
        let deps = self.problem.deps(&index);
        Frame {
            values: Vec::with_capacity(deps.len()),
            index,
            deps,
        }
    }

    /// Consumes the cache, returning the backend with every computed value.
    pub fn into_backend(self) -> B {
        self.backend.into_inner()
    }
}

impl<I, K, B, D, C> DpCache<I, K, B, ClosureProblem<I, K, D, C>>
where
    I: Clone + Hash + Eq,
    K: Clone,
    B: Backend<I, K>,
    D: Fn(&I) -> Vec<I>,
    C: Fn(&I, Vec<K>) -> K,
{
    /// Creates a DpCache from a dependency closure and a compute closure.
    pub fn new(backend: B, dep_fn: D, compute_fn: C) -> Self {
        Self::with_problem(backend, ClosureProblem::new(dep_fn, compute_fn))
    }
}
