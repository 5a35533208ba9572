// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open and close hooks.

use alloc::boxed::Box;

type Hook = Box<dyn FnMut()>;

/// Host hooks run on open and close transitions.
///
/// Both run inside an update cycle (see [`Scope::safe_apply`](crate::Scope::safe_apply)).
/// `on_close` only runs if the trigger's `value` changed since the menu was opened.
#[derive(Default)]
pub struct Callbacks {
    on_open: Option<Hook>,
    on_close: Option<Hook>,
}

impl core::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl Callbacks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the open hook.
    pub fn on_open(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(hook));
        self
    }

    /// Set the close hook.
    pub fn on_close(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub(crate) fn fire_open(&mut self) {
        if let Some(hook) = &mut self.on_open {
            hook();
        }
    }

    pub(crate) fn fire_close(&mut self) {
        if let Some(hook) = &mut self.on_close {
            hook();
        }
    }
}
