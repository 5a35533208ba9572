// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event Route: deterministic, `no_std` event routes and listener tables.
//!
//! ## Overview
//!
//! This crate answers two questions for an event delivered to a node in a tree:
//!
//! 1. In what order are nodes visited? [`router`] emits the capture → target → bubble route,
//!    rebuilding the root→target path from a [`ParentLookup`](types::ParentLookup).
//! 2. Who gets called at each step? [`listeners::Listeners`] stores listeners per
//!    `(node, event type)`, tagged with the [`ListenPhase`](types::ListenPhase) they asked for.
//!
//! [`dispatcher::run`] ties them together: it walks a route, lets a handler deliver each step,
//! and stops as soon as a handler returns [`Outcome::Stop`](types::Outcome::Stop).
//!
//! Hit testing is out of scope. Resolve the target node first, then route.
//!
//! ## Example
//!
//! ```
//! use understory_event_route::{dispatcher, router};
//! use understory_event_route::listeners::Listeners;
//! use understory_event_route::types::{ListenPhase, Outcome};
//!
//! // 1 is the root, 2 its child, 3 the target.
//! let parents = |n: &u32| (*n > 1).then(|| n - 1);
//! let mut table: Listeners<u32, &str, &str> = Listeners::new();
//! table.on(1, "click", ListenPhase::Capture, "root-capture");
//! table.on(3, "click", ListenPhase::Bubble, "target");
//! table.on(2, "click", ListenPhase::Bubble, "parent");
//!
//! let route = router::dispatch_for(3_u32, &parents);
//! let mut log = Vec::new();
//! dispatcher::run(&route, &mut log, |d, log| {
//!     log.extend(table.snapshot(d.node, "click", d.phase));
//!     Outcome::Continue
//! });
//! assert_eq!(log, ["root-capture", "target", "parent"]);
//! ```
//!
//! ## Adapters
//!
//! The [`adapters`] module integrates with other Understory crates:
//!
//! - **Element Tree Adapter** (`element_tree_adapter` feature): uses
//!   [`understory_element_tree::Document`] as the parent lookup.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod listeners;
pub mod router;
pub mod types;
