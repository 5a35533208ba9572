// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers, flags, positioning, and element data.

use alloc::string::String;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

/// Identifier for an element in a [`Document`](crate::Document) (generational).
///
/// Removing an element makes every copy of its id stale. A later element may
/// reuse the slot, but it gets a new generation, so stale ids never alias it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling display and focus.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is displayed. Cleared by [`Document::hide`](crate::Document::hide).
        const VISIBLE   = 0b0000_0001;
        /// Element can receive input focus.
        const FOCUSABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// How an element is placed in document space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Position {
    /// Placed at `local_bounds` relative to the parent's document origin.
    #[default]
    Static,
    /// Placed at fixed document coordinates, regardless of the parent.
    ///
    /// Only the size of `local_bounds` is used.
    Absolute {
        /// Distance from the top of the document.
        top: f64,
        /// Distance from the left of the document.
        left: f64,
    },
}

/// Local data for one element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Lowercase tag name, such as `"div"` or `"button"`.
    pub tag: String,
    /// Class list, without duplicates, in insertion order.
    pub classes: SmallVec<[String; 4]>,
    /// Attribute map. Classes are not stored here.
    pub attributes: HashMap<String, String>,
    /// Bounds relative to the parent's origin. Absolutely positioned elements only use the size.
    pub local_bounds: Rect,
    /// Display and focus flags.
    pub flags: ElementFlags,
    /// Placement mode.
    pub position: Position,
}

impl Default for Element {
    fn default() -> Self {
        Self::new("div")
    }
}

impl Element {
    /// Create an element with the given tag and default flags.
    pub fn new(tag: impl Into<String>) -> Self {
        let mut tag = tag.into();
        tag.make_ascii_lowercase();
        Self {
            tag,
            classes: SmallVec::new(),
            attributes: HashMap::new(),
            local_bounds: Rect::ZERO,
            flags: ElementFlags::default(),
            position: Position::Static,
        }
    }

    /// Add a class (ignored if already present).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the local bounds.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.local_bounds = bounds;
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the element as focusable.
    pub fn focusable(mut self) -> Self {
        self.flags |= ElementFlags::FOCUSABLE;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.flags.remove(ElementFlags::VISIBLE);
        self
    }

    /// Returns true if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}
