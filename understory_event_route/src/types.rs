// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for routing: phases, outcomes, dispatch steps, and parent lookup.

/// Propagation phase of one dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root toward the target's parent.
    Capture,
    /// The target itself.
    Target,
    /// The target's parent back toward the root.
    Bubble,
}

/// Result of a handler, controlling propagation only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep walking the route.
    #[default]
    Continue,
    /// Abort the route at this step.
    Stop,
}

/// The phase a listener registers for.
///
/// Mirrors the `useCapture` flag of DOM listeners: both kinds run at the target,
/// capture listeners additionally run on the way down and bubble listeners on the way up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ListenPhase {
    /// Runs during [`Phase::Capture`] and [`Phase::Target`].
    Capture,
    /// Runs during [`Phase::Target`] and [`Phase::Bubble`].
    #[default]
    Bubble,
}

impl ListenPhase {
    /// Returns true if a listener registered for `self` runs at `phase`.
    pub const fn fires_at(self, phase: Phase) -> bool {
        matches!(
            (self, phase),
            (_, Phase::Target) | (Self::Capture, Phase::Capture) | (Self::Bubble, Phase::Bubble)
        )
    }
}

/// One step of a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node visited at this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture step at `node`.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target step at `node`.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step at `node`.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Parent lookup used to rebuild a root→target path.
pub trait ParentLookup<K> {
    /// The parent of `node`, or `None` at a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A lookup in which every node is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}

impl<K, F: Fn(&K) -> Option<K>> ParentLookup<K> for F {
    fn parent_of(&self, node: &K) -> Option<K> {
        self(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_phase_fires_at() {
        assert!(ListenPhase::Capture.fires_at(Phase::Capture));
        assert!(ListenPhase::Capture.fires_at(Phase::Target));
        assert!(!ListenPhase::Capture.fires_at(Phase::Bubble));
        assert!(!ListenPhase::Bubble.fires_at(Phase::Capture));
        assert!(ListenPhase::Bubble.fires_at(Phase::Target));
        assert!(ListenPhase::Bubble.fires_at(Phase::Bubble));
    }

    #[test]
    fn closures_act_as_parent_lookup() {
        let parents = |n: &u32| (*n > 0).then(|| n - 1);
        assert_eq!(parents.parent_of(&2), Some(1));
        assert_eq!(parents.parent_of(&0), None);
        assert_eq!(NoParent.parent_of(&5_u32), None);
    }
}
