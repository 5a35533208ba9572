// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, element state, geometry, queries.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::selector::Selector;
use crate::types::{Element, ElementFlags, ElementId, Position};

/// A retained element tree with an `html` root and a `body` child.
///
/// Elements are addressed by generational [`ElementId`]s. Every mutator is a
/// no-op for stale ids, and every accessor returns `None` or `false` for them.
///
/// Unlike the box tree, changes take effect immediately. Offsets are derived
/// on demand from local bounds and [`Position`], so there is no commit step.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_element_tree::{Document, Element};
///
/// let mut doc = Document::new();
/// let panel = doc.insert(
///     Some(doc.body()),
///     Element::new("div").with_bounds(Rect::new(10.0, 10.0, 110.0, 60.0)),
/// );
/// let button = doc.insert(
///     Some(panel),
///     Element::new("button").with_bounds(Rect::new(5.0, 5.0, 45.0, 25.0)),
/// );
///
/// assert_eq!(doc.offset(button), Some(Point::new(15.0, 15.0)));
/// assert_eq!(doc.height(button), Some(20.0));
/// assert_eq!(doc.hit_test_point(Point::new(20.0, 20.0)), Some(button));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    body: ElementId,
    focused: Option<ElementId>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    element: Element,
}

impl Document {
    /// Create a document holding only `html` and `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 0),
            body: ElementId::new(0, 0),
            focused: None,
        };
        let root = doc.alloc(Element::new("html"));
        let body = doc.alloc(Element::new("body"));
        doc.link_parent(body, root);
        doc.root = root;
        doc.body = body;
        doc
    }

    /// The `html` element. It can't be removed or moved.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The `body` element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    fn alloc(&mut self, element: Element) -> ElementId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        ElementId::new(idx as u32, generation)
    }

    /// Insert a new element as the last child of `parent`.
    ///
    /// With `None` (or a stale parent) the element is created detached: it is
    /// live but not connected to the document until moved with
    /// [`Document::append_child`].
    pub fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let id = self.alloc(element);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// Removing the root is ignored. Focus inside the subtree is cleared.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(focused) = self.focused
            && self.contains(id, focused)
        {
            self.focused = None;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` (with its subtree) to the end of `parent`'s children.
    ///
    /// Returns `false` and leaves the tree untouched if either id is stale,
    /// if `id` is the root, or if `parent` lies inside `id`'s subtree.
    pub fn append_child(&mut self, parent: ElementId, id: ElementId) -> bool {
        if !self.is_alive(parent)
            || !self.is_alive(id)
            || id == self.root
            || self.contains(id, parent)
        {
            return false;
        }
        if let Some(old) = self.node(id).parent {
            self.unlink_parent(id, old);
        }
        self.link_parent(id, parent);
        true
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is live and reachable from the root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Returns true if `descendant` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: ElementId, descendant: ElementId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(descendant);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent_of(id);
        }
        false
    }

    /// Element data for a live id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Mutable element data for a live id.
    ///
    /// Structural fields (parent, children) are not reachable through this.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.node_opt_mut(id).map(|n| &mut n.element)
    }

    /// Returns the parent of an element, or `None` for roots, detached elements, and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of an element, or an empty slice if the id is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// The element that directly follows `id` under the same parent.
    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent_of(id)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Iterate the ancestors of `id`, nearest first. Excludes `id` itself.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        core::iter::successors(self.parent_of(id), |&p| self.parent_of(p))
    }

    /// Get the next element in depth-first (document) order.
    ///
    /// Returns `None` at the end of the tree or if `current` is stale.
    pub fn next_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if !self.is_alive(current) {
            return None;
        }
        self.next_within(current, None)
    }

    /// Iterate the strict descendants of `scope` in document order.
    pub fn descendants(&self, scope: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let first = self.children_of(scope).first().copied();
        core::iter::successors(first, move |&cur| self.next_within(cur, Some(scope)))
    }

    fn next_within(&self, current: ElementId, scope: Option<ElementId>) -> Option<ElementId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        loop {
            if Some(node) == scope {
                return None;
            }
            if let Some(sibling) = self.next_sibling(node) {
                return Some(sibling);
            }
            node = self.parent_of(node)?;
        }
    }

    // --- classes ---

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add `class` unless already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.element_mut(id)
            && !el.has_class(class)
        {
            el.classes.push(String::from(class));
        }
    }

    /// Remove `class` if present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.is_alive(id)
        }
    }

    // --- attributes ---

    /// The value of attribute `name`, if set.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)?.attributes.get(name).map(String::as_str)
    }

    /// Returns true if attribute `name` is set (possibly to an empty value).
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.attributes.contains_key(name))
    }

    /// Set attribute `name`.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.insert(String::from(name), String::from(value));
        }
    }

    /// Remove attribute `name`, returning its old value.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Option<String> {
        self.element_mut(id)?.attributes.remove(name)
    }

    // --- visibility ---

    /// Display the element.
    pub fn show(&mut self, id: ElementId) {
        if let Some(el) = self.element_mut(id) {
            el.flags.insert(ElementFlags::VISIBLE);
        }
    }

    /// Stop displaying the element (and therefore its subtree).
    pub fn hide(&mut self, id: ElementId) {
        if let Some(el) = self.element_mut(id) {
            el.flags.remove(ElementFlags::VISIBLE);
        }
    }

    /// Flip the element's own display flag; returns whether it is shown afterwards.
    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.flags.toggle(ElementFlags::VISIBLE);
                el.flags.contains(ElementFlags::VISIBLE)
            }
            None => false,
        }
    }

    /// Returns true if the element's own display flag is set.
    pub fn is_shown(&self, id: ElementId) -> bool {
        self.element(id)
            .is_some_and(|el| el.flags.contains(ElementFlags::VISIBLE))
    }

    /// Returns true if the element and all of its ancestors are shown.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        self.is_shown(id) && self.ancestors(id).all(|a| self.is_shown(a))
    }

    // --- geometry ---

    /// Replace the element's placement mode.
    pub fn set_position(&mut self, id: ElementId, position: Position) {
        if let Some(el) = self.element_mut(id) {
            el.position = position;
        }
    }

    /// The element's placement mode.
    pub fn position(&self, id: ElementId) -> Option<Position> {
        self.element(id).map(|el| el.position)
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(el) = self.element_mut(id) {
            el.local_bounds = bounds;
        }
    }

    /// Document-space origin of the element.
    ///
    /// Static elements accumulate their local origin onto the parent's offset.
    /// Absolute elements sit at their `top`/`left`.
    pub fn offset(&self, id: ElementId) -> Option<Point> {
        let node = self.node_opt(id)?;
        match node.element.position {
            Position::Absolute { top, left } => Some(Point::new(left, top)),
            Position::Static => {
                let base = node
                    .parent
                    .and_then(|p| self.offset(p))
                    .unwrap_or(Point::ZERO);
                Some(base + node.element.local_bounds.origin().to_vec2())
            }
        }
    }

    /// Rendered height of the element.
    pub fn height(&self, id: ElementId) -> Option<f64> {
        self.element(id).map(|el| el.local_bounds.height())
    }

    /// Document-space bounds of the element.
    pub fn world_bounds(&self, id: ElementId) -> Option<Rect> {
        let origin = self.offset(id)?;
        let size = self.element(id)?.local_bounds.size();
        Some(Rect::from_origin_size(origin, size))
    }

    /// Find the element under a document-space point.
    ///
    /// Only displayed elements are candidates. Among candidates, the one
    /// latest in document order wins, so descendants beat their ancestors and
    /// later siblings beat earlier ones.
    pub fn hit_test_point(&self, point: Point) -> Option<ElementId> {
        let mut best = None;
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            if !self.is_shown(id) {
                // Hidden subtrees are skipped entirely.
                continue;
            }
            if self.world_bounds(id).is_some_and(|r| r.contains(point)) {
                best = Some(id);
            }
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        best
    }

    // --- queries ---

    /// Returns true if a live element matches `selector`.
    pub fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        self.is_alive(id) && selector.matches(self, id)
    }

    /// First strict descendant of `scope` matching `selector`, in document order.
    pub fn query_first(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope).find(|&id| selector.matches(self, id))
    }

    /// All strict descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    // --- focus ---

    /// Move input focus to `id`.
    ///
    /// Succeeds only for live, connected, displayed, focusable elements.
    /// Otherwise focus is left unchanged and `false` is returned.
    pub fn focus(&mut self, id: ElementId) -> bool {
        let focusable = self
            .element(id)
            .is_some_and(|el| el.flags.contains(ElementFlags::FOCUSABLE));
        if !focusable || !self.is_connected(id) || !self.is_displayed(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear input focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The element holding input focus.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused.filter(|&id| self.is_alive(id))
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
