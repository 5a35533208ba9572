// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core stays `no_std` and dependency-light.
//!
//! ## Available Adapters
//!
//! - [`element_tree`] (`element_tree_adapter` feature): parent lookup over
//!   [`understory_element_tree::Document`], so routes can be rebuilt from any element id.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
