// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Dropdown: a headless dropdown controller.
//!
//! A dropdown is a trigger element plus the element right after it, the menu. Clicking the
//! trigger shows or hides the menu; clicking anywhere else closes it. This crate implements
//! that behavior over an [`understory_element_tree::Document`] with events routed by
//! [`understory_event_route`], so it can be driven and tested without a browser.
//!
//! ## Behavior
//!
//! - **Toggle**: opening first clicks the document root so other open dropdowns close, then
//!   (with automatic positioning) places the menu [`MENU_GAP`] below the trigger. The trigger
//!   click stops propagating, so the outside-click listener it registers does not fire for
//!   the same click.
//! - **Open**: adds the open class, records the trigger's `value`, runs `on_open`, and focuses
//!   the first `focus-on-open` match inside the menu.
//! - **Close**: removes the open class and runs `on_close` if `value` changed since the open.
//! - **Outside click**: a root listener closes the menu and queues
//!   [`Broadcast::OutsideClickClosed`].
//! - **Menu clicks** stop at the menu and never count as outside clicks.
//! - **Handler elements** (`.open-drop-down` in the trigger's parent) flip the indicator
//!   classes and toggle.
//! - **`tab-alive`** enables or disables the trigger when written with [`Page::set_attribute`].
//! - **Close requests**: [`Broadcast::CloseDropDown`] closes the instance with that
//!   `drop-down-id`.
//! - **Teardown**: [`Page::destroy`] detaches listeners and removes a relocated menu.
//!
//! Hooks run through [`Scope::safe_apply`], which joins a running update cycle
//! (for example inside [`Page::apply`]) or starts one.
//!
//! ## Example
//!
//! ```
//! use understory_dropdown::{Broadcast, Callbacks, Page};
//! use understory_element_tree::Element;
//!
//! let mut page = Page::new();
//! let body = page.document().body();
//! let doc = page.document_mut();
//! let trigger = doc.insert(
//!     Some(body),
//!     Element::new("button").with_attribute("drop-down-id", "sort"),
//! );
//! doc.insert(Some(body), Element::new("ul"));
//!
//! let sort = page.bind_dropdown(trigger, Callbacks::new()).unwrap();
//! page.click(trigger);
//! assert!(page.is_open(sort));
//!
//! page.broadcast(&Broadcast::close("sort"));
//! assert!(!page.is_open(sort));
//! assert_eq!(
//!     page.drain_broadcasts(),
//!     [Broadcast::OutsideClickClosed { id: Some("sort".into()) }]
//! );
//! ```
//!
//! ## Logging
//!
//! Transitions are reported with `tracing` at `debug` level and event delivery at `trace`
//! level. The crate never installs a subscriber.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod broadcast;
mod callbacks;
pub mod config;
mod controller;
mod error;
mod page;
mod scope;

pub use broadcast::Broadcast;
pub use callbacks::Callbacks;
pub use config::{DropdownClasses, DropdownConfig};
pub use controller::{Dropdown, MENU_GAP};
pub use error::DropdownError;
pub use page::{DropdownId, EventInfo, EventType, HostListenerId, Page};
pub use scope::{DigestPhase, Scope};

pub use understory_event_route::types::{ListenPhase, Outcome, Phase};
