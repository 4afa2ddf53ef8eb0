//! Storage backends for the DP cache.

use std::collections::HashMap;
use std::hash::Hash;

/// Storage for computed values.
pub trait Backend<I, K> {
    /// Returns the stored value, if any.
    fn get(&self, index: &I) -> Option<&K>;

    /// Stores `value`, replacing nothing: an index is computed at most once.
    fn insert(&mut self, index: I, value: K);

    /// Returns the stored value or stores the one produced by `f`.
    fn get_or_insert(&mut self, index: I, f: impl FnOnce() -> K) -> &K;
}

/// A Vec-based backend for dense `usize` indices.
#[derive(Debug)]
pub struct VecBackend<K> {
    data: Vec<Option<K>>,
}

impl<K> VecBackend<K> {
    /// Creates a new empty VecBackend.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates a VecBackend with room for `capacity` indices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    fn ensure_index(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }
}

impl<K> Default for VecBackend<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Backend<usize, K> for VecBackend<K> {
    fn get(&self, index: &usize) -> Option<&K> {
        self.data.get(*index)?.as_ref()
    }

    fn insert(&mut self, index: usize, value: K) {
        self.ensure_index(index);
        if self.data[index].is_none() {
            self.data[index] = Some(value);
        }
    }

    fn get_or_insert(&mut self, index: usize, f: impl FnOnce() -> K) -> &K {
        self.ensure_index(index);
        self.data[index].get_or_insert_with(f)
    }
}

/// A HashMap-based backend for arbitrary hashable indices.
#[derive(Debug)]
pub struct HashMapBackend<I, K> {
    data: HashMap<I, K>,
}

impl<I, K> HashMapBackend<I, K> {
    /// Creates a new empty HashMapBackend.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<I, K> Default for HashMapBackend<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Hash + Eq, K> Backend<I, K> for HashMapBackend<I, K> {
    fn get(&self, index: &I) -> Option<&K> {
        self.data.get(index)
    }

    fn insert(&mut self, index: I, value: K) {
        self.data.entry(index).or_insert(value);
    }

    fn get_or_insert(&mut self, index: I, f: impl FnOnce() -> K) -> &K {
        self.data.entry(index).or_insert_with(f)
    }
}
