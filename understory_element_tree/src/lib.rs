// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Element Tree: a small retained element tree for headless widgets.
//!
//! Widgets such as dropdowns, popovers, and tab strips need a model of the page they live in:
//! which element contains which, what classes and attributes they carry, whether they are
//! shown, where they sit on screen, and who holds focus. This crate provides exactly that and
//! nothing more.
//!
//! - Elements form a hierarchy under an `html` root with a `body` child.
//! - Each element carries a tag, a class list, string attributes, local bounds, and flags.
//! - A compact selector language (tags, ids, classes, attributes, descendant combinators,
//!   and comma-separated alternatives) drives scoped queries.
//!
//! ## Not a layout engine
//!
//! Bounds are set by upstream code. Offsets are derived on demand: static elements stack their
//! local origin onto the parent's offset, absolutely positioned elements sit at fixed document
//! coordinates. There is no style cascade and no rendering.
//!
//! ## API overview
//!
//! - [`Document`]: owns elements and provides structure, class, attribute, visibility,
//!   geometry, query, and focus operations.
//! - [`Element`]: per-element data, with builder helpers for construction.
//! - [`ElementId`]: generational handle. Stale handles are rejected, never aliased.
//! - [`ElementFlags`]: display and focusability.
//! - [`Position`]: static or absolute placement.
//! - [`Selector`]: parsed selector list; see [`SelectorError`] for parse failures.
//!
//! ## Example
//!
//! ```rust
//! use understory_element_tree::{Document, Element, Selector};
//!
//! let mut doc = Document::new();
//! let menu = doc.insert(Some(doc.body()), Element::new("ul").with_class("menu"));
//! let item = doc.insert(Some(menu), Element::new("li").with_attribute("data-id", "1"));
//!
//! let sel = Selector::parse(".menu [data-id]").unwrap();
//! assert_eq!(doc.query_first(doc.body(), &sel), Some(item));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod selector;
mod types;

pub use document::Document;
pub use selector::{Selector, SelectorError};
pub use types::{Element, ElementFlags, ElementId, Position};
