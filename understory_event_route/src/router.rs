// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route construction.
//!
//! ## Overview
//!
//! Turns a target (plus a way to find parents) into a capture → target → bubble sequence.
//! No hit testing happens here; callers resolve the target first.
//!
//! ## Shape
//!
//! For a path `[root, .., parent, target]` the emitted sequence is:
//!
//! - `Capture` for each ancestor, root first.
//! - `Target` exactly once.
//! - `Bubble` for each ancestor, parent first.
//!
//! A target without ancestors yields a single `Target` step.

use alloc::vec::Vec;

use crate::types::{Dispatch, ParentLookup};

/// Emit the route for `target`, rebuilding its path with `parents`.
pub fn dispatch_for<K: Copy>(target: K, parents: &impl ParentLookup<K>) -> Vec<Dispatch<K>> {
    dispatch_path(&reconstruct_path(target, parents))
}

/// Emit the route for an explicit root→target path.
///
/// An empty path yields an empty route.
pub fn dispatch_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
    out.push(Dispatch::target(target));
    out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    out
}

/// Walk `parents` from `target` up to a root and return the root→target path.
///
/// The lookup must be acyclic.
pub fn reconstruct_path<K: Copy>(target: K, parents: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    loop {
        out.push(cur);
        match parents.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}
