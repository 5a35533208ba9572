// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Messages exchanged between the host and bound dropdowns.

use alloc::string::String;

/// A page-wide message.
///
/// Inbound messages are delivered with [`Page::broadcast`](crate::Page::broadcast) to every
/// bound dropdown in bind order. Outbound messages are queued by dropdowns and collected with
/// [`Page::drain_broadcasts`](crate::Page::drain_broadcasts).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Broadcast {
    /// Inbound: close the dropdown whose `drop-down-id` equals `id`.
    CloseDropDown {
        /// Target identifier.
        id: String,
    },
    /// Inbound: every open dropdown closes as if clicked outside.
    ///
    /// Closed dropdowns only rerun their close transition; their indicators stay put.
    ClickOutside,
    /// Outbound: an outside click closed the dropdown with this identifier.
    OutsideClickClosed {
        /// Identifier of the closed dropdown, if it has one.
        id: Option<String>,
    },
}

impl Broadcast {
    /// Shorthand for [`Broadcast::CloseDropDown`].
    pub fn close(id: impl Into<String>) -> Self {
        Self::CloseDropDown { id: id.into() }
    }
}
