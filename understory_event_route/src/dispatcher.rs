// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walk a route and honor stop outcomes.
//!
//! [`Outcome`] only controls propagation. Anything richer, such as "default prevented" or
//! a list of effects to apply afterwards, belongs on the event value threaded through [`run`].
//!
//! ## Example
//!
//! ```
//! use understory_event_route::{dispatcher, router};
//! use understory_event_route::types::{Outcome, Phase};
//!
//! let parents = |n: &u32| (*n > 1).then(|| n - 1);
//! let route = router::dispatch_for(3_u32, &parents);
//!
//! // Stop once the target has been seen.
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&route, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Target { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stopped.map(|d| d.node), Some(3));
//! assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run `handler` over each step of `seq`, in order.
///
/// Returns the step whose handler returned [`Outcome::Stop`], or `None` if the whole
/// route was visited. Steps after a stop are never visited.
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    seq.iter().find(|d| handler(d, event) == Outcome::Stop)
}
