// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry keyed by node and event type.
//!
//! A [`Listeners`] table stores opaque listener values `L` per `(node, event type)`, each
//! tagged with the [`ListenPhase`] it was registered for. It does not call anything itself:
//! callers take a [`snapshot`](Listeners::snapshot) for a route step and invoke the listeners
//! however they like. Taking a snapshot first means listeners may freely add or remove
//! registrations (including their own) while a step is being delivered.
//!
//! ```
//! use understory_event_route::listeners::Listeners;
//! use understory_event_route::types::{ListenPhase, Phase};
//!
//! let mut table: Listeners<u32, &str, char> = Listeners::new();
//! table.on(1, "click", ListenPhase::Bubble, 'a');
//! table.on(1, "click", ListenPhase::Capture, 'b');
//!
//! assert_eq!(table.snapshot(1, "click", Phase::Bubble).as_slice(), ['a']);
//! assert_eq!(table.snapshot(1, "click", Phase::Target).as_slice(), ['a', 'b']);
//! assert_eq!(table.off(1, "click", |l| *l == 'a'), 1);
//! assert_eq!(table.count(1, "click"), 1);
//! ```

use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{ListenPhase, Phase};

#[derive(Clone, Debug)]
struct Entry<L> {
    phase: ListenPhase,
    listener: L,
}

/// Registry of listeners per `(node, event type)`, in registration order.
#[derive(Clone, Debug)]
pub struct Listeners<K, T, L> {
    table: HashMap<(K, T), SmallVec<[Entry<L>; 2]>>,
}

impl<K, T, L> Default for Listeners<K, T, L> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, T: Copy + Eq + Hash, L> Listeners<K, T, L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` on `node` for `ty`.
    ///
    /// Duplicates are kept; each registration is delivered separately.
    pub fn on(&mut self, node: K, ty: T, phase: ListenPhase, listener: L) {
        self.table
            .entry((node, ty))
            .or_default()
            .push(Entry { phase, listener });
    }

    /// Remove every listener on `(node, ty)` for which `pred` returns true.
    ///
    /// Returns the number removed.
    pub fn off(&mut self, node: K, ty: T, mut pred: impl FnMut(&L) -> bool) -> usize {
        let Some(entries) = self.table.get_mut(&(node, ty)) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|e| !pred(&e.listener));
        let removed = before - entries.len();
        if entries.is_empty() {
            self.table.remove(&(node, ty));
        }
        removed
    }

    /// Remove all listeners on `(node, ty)`.
    pub fn off_all(&mut self, node: K, ty: T) -> usize {
        self.table.remove(&(node, ty)).map_or(0, |e| e.len())
    }

    /// Remove all listeners on `node`, for every event type.
    pub fn clear_node(&mut self, node: K) -> usize {
        let mut removed = 0;
        self.table.retain(|(n, _), entries| {
            if *n == node {
                removed += entries.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// Keep only the listeners for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(K, T, &L) -> bool) {
        self.table.retain(|&(node, ty), entries| {
            entries.retain(|e| keep(node, ty, &e.listener));
            !entries.is_empty()
        });
    }

    /// Copy out the listeners on `(node, ty)` that fire at `phase`, in registration order.
    pub fn snapshot(&self, node: K, ty: T, phase: Phase) -> SmallVec<[L; 4]>
    where
        L: Clone,
    {
        self.table
            .get(&(node, ty))
            .into_iter()
            .flatten()
            .filter(|e| e.phase.fires_at(phase))
            .map(|e| e.listener.clone())
            .collect()
    }

    /// Returns true if some listener on `(node, ty)` satisfies `pred`.
    pub fn contains(&self, node: K, ty: T, mut pred: impl FnMut(&L) -> bool) -> bool {
        self.table
            .get(&(node, ty))
            .is_some_and(|entries| entries.iter().any(|e| pred(&e.listener)))
    }

    /// Number of listeners on `(node, ty)`.
    pub fn count(&self, node: K, ty: T) -> usize {
        self.table.get(&(node, ty)).map_or(0, |e| e.len())
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.table.values().map(|e| e.len()).sum()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
