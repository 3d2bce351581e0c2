// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit dirty-flag dependency graph.
//!
//! A [`Graph`] records which derived values read which sources. It stores
//! no values itself: the owner keeps the values, calls
//! [`invalidate`](Graph::invalidate) when a source changes, and once per
//! frame calls [`flush`](Graph::flush) to learn which derived values to
//! recompute, dependencies first.
//!
//! Invalidation marks the [`DERIVED`](crate::dirty::DERIVED) channel
//! eagerly, so a derived value that reads another derived value is
//! reported too. Invalidating the same source twice before a flush reports
//! its dependents once.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;

/// A node in a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(u32);

impl Key {
    /// Raw index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyKind {
    Source,
    Derived,
}

/// Dependency graph between sources and derived values.
pub struct Graph {
    dirty: DirtyTracker<u32>,
    kinds: Vec<KeyKind>,
    names: Vec<&'static str>,
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            kinds: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Adds a source.
    pub fn source(&mut self, name: &'static str) -> Key {
        self.push(name, KeyKind::Source)
    }

    /// Adds a derived value that reads `inputs`. It starts dirty so the
    /// first flush computes it.
    ///
    /// # Panics
    ///
    /// Panics if an input key does not belong to this graph.
    pub fn derived(&mut self, name: &'static str, inputs: &[Key]) -> Key {
        for input in inputs {
            assert!(
                (input.0 as usize) < self.kinds.len(),
                "unknown reactive key: {input:?}"
            );
        }
        let key = self.push(name, KeyKind::Derived);
        for input in inputs {
            let _ = self.dirty.add_dependency(key.0, input.0, dirty::DERIVED);
        }
        self.dirty.mark(key.0, dirty::DERIVED);
        key
    }

    /// Marks a source changed.
    pub fn invalidate(&mut self, source: Key) {
        self.dirty.mark_with(source.0, dirty::DERIVED, &EagerPolicy);
    }

    /// Returns the derived values to recompute, dependencies first, and
    /// clears all marks.
    pub fn flush(&mut self) -> Vec<Key> {
        self.dirty
            .drain(dirty::DERIVED)
            .affected()
            .deterministic()
            .run()
            .filter(|&k| self.kinds.get(k as usize) == Some(&KeyKind::Derived))
            .map(Key)
            .collect()
    }

    /// The name a key was registered with.
    #[must_use]
    pub fn name(&self, key: Key) -> &'static str {
        self.names.get(key.0 as usize).copied().unwrap_or("?")
    }

    fn push(&mut self, name: &'static str, kind: KeyKind) -> Key {
        let key = Key(u32::try_from(self.kinds.len()).unwrap_or(u32::MAX));
        self.kinds.push(kind);
        self.names.push(name);
        key
    }
}
