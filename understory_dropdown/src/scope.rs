// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update cycle tracking.
//!
//! Hosts that re-render after state changes batch that work into update cycles. A cycle
//! starts in [`DigestPhase::Apply`] while changes are made, passes through
//! [`DigestPhase::Digest`] when it settles, and ends back at [`DigestPhase::Idle`].
//! [`Scope::safe_apply`] joins the running cycle when there is one and starts a fresh
//! cycle otherwise, so hooks never start a cycle inside another.

use tracing::trace;

/// Where the update cycle currently is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DigestPhase {
    /// No cycle running.
    #[default]
    Idle,
    /// Changes are being applied.
    Apply,
    /// The cycle is settling.
    Digest,
}

/// Update cycle state for one [`Page`](crate::Page).
#[derive(Clone, Debug, Default)]
pub struct Scope {
    phase: DigestPhase,
    cycles: u64,
}

impl Scope {
    /// An idle scope with no completed cycles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> DigestPhase {
        self.phase
    }

    /// Returns true while a cycle is running.
    pub fn in_progress(&self) -> bool {
        self.phase != DigestPhase::Idle
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Start a cycle unless one is running. Returns true if a cycle was started.
    pub fn begin(&mut self) -> bool {
        if self.in_progress() {
            return false;
        }
        self.phase = DigestPhase::Apply;
        true
    }

    /// Settle and end the running cycle.
    pub fn finish(&mut self) {
        if !self.in_progress() {
            return;
        }
        self.phase = DigestPhase::Digest;
        self.cycles += 1;
        trace!(cycle = self.cycles, "digest");
        self.phase = DigestPhase::Idle;
    }

    /// Run `f` inside an update cycle.
    ///
    /// If a cycle is running, `f` runs immediately as part of it. Otherwise a new cycle is
    /// started around `f`.
    ///
    /// ```
    /// use understory_dropdown::Scope;
    ///
    /// let mut scope = Scope::new();
    /// scope.safe_apply(|| {});
    /// assert_eq!(scope.cycles(), 1);
    ///
    /// scope.begin();
    /// scope.safe_apply(|| {});
    /// scope.safe_apply(|| {});
    /// scope.finish();
    /// assert_eq!(scope.cycles(), 2);
    /// ```
    pub fn safe_apply<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let started = self.begin();
        let out = f();
        if started {
            self.finish();
        }
        out
    }
}
