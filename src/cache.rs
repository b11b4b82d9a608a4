// src/cache.rs
//! Per-key compute-once cache.
//!
//! The map lock only guards cell lookup; initialization runs on the cell, so
//! work for one key never blocks lookups of another. A failed initialization
//! leaves the cell empty and the next caller retries.

use std::hash::Hash;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

pub struct KeyedOnce<K, V> {
    cells: Mutex<FxHashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for KeyedOnce<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> KeyedOnce<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let cell = self.cells.lock().get(key).cloned()?;
        cell.get().cloned()
    }

    /// Return the published value for `key`, running `init` if there is none.
    ///
    /// At most one initializer runs per key at a time; every caller that
    /// succeeds observes the same published value.
    pub fn get_or_try_init<E, F>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let cell = self.cells.lock().entry(key).or_default().clone();
        if let Some(value) = cell.get() {
            tracing::trace!("cache hit");
            return Ok(value.clone());
        }
        cell.get_or_try_init(init).cloned()
    }

    /// Number of published values.
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
