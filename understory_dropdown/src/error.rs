// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while binding or addressing dropdowns.
//!
//! Event handling itself never fails: missing elements and empty selector matches are no-ops.

use understory_element_tree::{ElementId, SelectorError};

use crate::page::DropdownId;

/// Error returned by the fallible [`Page`](crate::Page) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DropdownError {
    /// The element is not live.
    #[error("element {0:?} is not live")]
    StaleElement(ElementId),
    /// The trigger has no next sibling to use as the menu.
    #[error("trigger {0:?} has no next sibling to use as the menu")]
    MissingMenu(ElementId),
    /// A selector attribute failed to parse.
    #[error("invalid selector in `{attribute}`")]
    InvalidSelector {
        /// Attribute the selector came from.
        attribute: &'static str,
        /// Parse failure.
        source: SelectorError,
    },
    /// The dropdown was destroyed or never bound.
    #[error("dropdown {0:?} is not bound")]
    UnknownDropdown(DropdownId),
}
