// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host a dropdown runs against: document, listeners, update cycle, and broadcasts.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Point;
use tracing::trace;
use understory_element_tree::{Document, ElementId};
use understory_event_route::listeners::Listeners;
use understory_event_route::types::{Dispatch, ListenPhase, Outcome, Phase};
use understory_event_route::{dispatcher, router};

use crate::broadcast::Broadcast;
use crate::controller::Dropdown;
use crate::scope::Scope;

/// Event types the page dispatches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer click.
    Click,
    /// Key release.
    KeyUp,
}

/// Handle of a bound dropdown. Never reused after [`Page::destroy`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropdownId(pub(crate) u32);

/// Handle of a host listener registered with [`Page::listen`]. Never reused after
/// [`Page::unlisten`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostListenerId(pub(crate) u32);

/// What a host listener is told about the event being delivered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    /// Event type.
    pub event: EventType,
    /// Element the event was dispatched to.
    pub target: ElementId,
    /// Element whose listeners are running.
    pub current: ElementId,
    /// Phase of the current step.
    pub phase: Phase,
}

/// A registered listener. Dropdown listeners carry the instance they belong to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Listener {
    Trigger(DropdownId),
    Handler(DropdownId),
    Menu(DropdownId),
    Outside(DropdownId),
    Host(HostListenerId),
}

impl Listener {
    pub(crate) fn dropdown(self) -> Option<DropdownId> {
        match self {
            Self::Trigger(id) | Self::Handler(id) | Self::Menu(id) | Self::Outside(id) => Some(id),
            Self::Host(_) => None,
        }
    }
}

type HostCallback = Box<dyn FnMut(&mut Page, &EventInfo) -> Outcome>;

struct HostSlot {
    element: ElementId,
    event: EventType,
    /// `None` while the callback is running.
    callback: Option<HostCallback>,
}

/// A headless page: one [`Document`] plus everything the dropdowns bound to it need.
///
/// Events are delivered synchronously along the element path, capture → target → bubble.
/// A listener that returns [`Outcome::Stop`] lets the remaining listeners on the same
/// element run, then ends propagation.
///
/// ## Example
///
/// ```
/// use understory_dropdown::{Callbacks, Page};
/// use understory_element_tree::Element;
///
/// let mut page = Page::new();
/// let body = page.document().body();
/// let trigger = page.document_mut().insert(Some(body), Element::new("button"));
/// let menu = page.document_mut().insert(Some(body), Element::new("ul"));
///
/// let id = page.bind_dropdown(trigger, Callbacks::new()).unwrap();
/// assert!(!page.is_open(id));
///
/// page.click(trigger);
/// assert!(page.is_open(id));
/// assert!(page.document().has_class(trigger, "drop-down-open"));
///
/// // Clicking anywhere else closes it.
/// page.click(body);
/// assert!(!page.is_open(id));
/// assert!(!page.document().is_shown(menu));
/// ```
pub struct Page {
    pub(crate) document: Document,
    pub(crate) listeners: Listeners<ElementId, EventType, Listener>,
    pub(crate) scope: Scope,
    /// Indexed by `DropdownId`. Destroyed slots stay `None` so ids are never reused.
    pub(crate) dropdowns: Vec<Option<Dropdown>>,
    /// Indexed by `HostListenerId`, with the same no-reuse rule.
    host_handlers: Vec<Option<HostSlot>>,
    pub(crate) outbox: Vec<Broadcast>,
}

impl core::fmt::Debug for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let bound = self.dropdowns.iter().filter(|d| d.is_some()).count();
        let hosts = self.host_handlers.iter().filter(|h| h.is_some()).count();
        f.debug_struct("Page")
            .field("document", &self.document)
            .field("listeners", &self.listeners.len())
            .field("scope", &self.scope)
            .field("dropdowns", &bound)
            .field("host_handlers", &hosts)
            .field("outbox", &self.outbox)
            .finish()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Handles use 32-bit indices by design."
)]
pub(crate) const fn handle_index(idx: usize) -> u32 {
    idx as u32
}

impl Page {
    /// A page around an empty [`Document`].
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// A page around an existing document.
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            listeners: Listeners::new(),
            scope: Scope::new(),
            dropdowns: Vec::new(),
            host_handlers: Vec::new(),
            outbox: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document.
    ///
    /// Writes made here are not observed. Use [`Page::set_attribute`] for attributes that
    /// dropdowns watch, and [`Page::remove_element`] to drop listeners with their elements.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The update cycle.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Run `f` inside one update cycle.
    ///
    /// Hooks fired by `f` join this cycle instead of starting their own.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let started = self.scope.begin();
        let out = f(self);
        if started {
            self.scope.finish();
        }
        out
    }

    // --- events ---

    /// Dispatch a click to `target`.
    ///
    /// Returns the element where propagation was stopped, or `None` if the route ran to the
    /// end (or `target` is stale).
    pub fn click(&mut self, target: ElementId) -> Option<ElementId> {
        self.dispatch(target, EventType::Click)
    }

    /// Dispatch a click to whatever is under `point`, falling back to the root.
    pub fn click_at(&mut self, point: Point) -> Option<ElementId> {
        let target = self
            .document
            .hit_test_point(point)
            .unwrap_or(self.document.root());
        self.click(target)
    }

    /// Dispatch a key release to `target`.
    pub fn key_up(&mut self, target: ElementId) -> Option<ElementId> {
        self.dispatch(target, EventType::KeyUp)
    }

    /// Dispatch `event` to `target` along its element path.
    pub fn dispatch(&mut self, target: ElementId, event: EventType) -> Option<ElementId> {
        if !self.document.is_alive(target) {
            return None;
        }
        let route = router::dispatch_for(target, &self.document);
        dispatcher::run(&route, self, |step, page| page.deliver(step, event, target))
            .map(|d| d.node)
    }

    fn deliver(
        &mut self,
        step: &Dispatch<ElementId>,
        event: EventType,
        target: ElementId,
    ) -> Outcome {
        let info = EventInfo {
            event,
            target,
            current: step.node,
            phase: step.phase,
        };
        let mut outcome = Outcome::Continue;
        for listener in self.listeners.snapshot(step.node, event, step.phase) {
            // Listeners removed by an earlier listener in this step do not run.
            if !self.listeners.contains(step.node, event, |l| *l == listener) {
                continue;
            }
            trace!(?listener, node = ?step.node, phase = ?step.phase, "deliver");
            if self.invoke(listener, &info) == Outcome::Stop {
                outcome = Outcome::Stop;
            }
        }
        outcome
    }

    fn invoke(&mut self, listener: Listener, info: &EventInfo) -> Outcome {
        match listener {
            Listener::Trigger(id) => self.on_trigger_click(id),
            Listener::Handler(id) => self.on_handler_click(id),
            Listener::Menu(_) => Outcome::Stop,
            Listener::Outside(id) => {
                self.on_outside_click(id);
                Outcome::Continue
            }
            Listener::Host(id) => self.run_host(id, info),
        }
    }

    // --- host listeners ---

    /// Register a host listener on `element` for `event`.
    ///
    /// The callback gets the page itself, so it may bind, destroy, or dispatch. A callback
    /// that dispatches an event reaching itself is skipped for that nested delivery.
    pub fn listen(
        &mut self,
        element: ElementId,
        event: EventType,
        phase: ListenPhase,
        callback: impl FnMut(&mut Self, &EventInfo) -> Outcome + 'static,
    ) -> HostListenerId {
        let id = HostListenerId(handle_index(self.host_handlers.len()));
        self.host_handlers.push(Some(HostSlot {
            element,
            event,
            callback: Some(Box::new(callback)),
        }));
        self.listeners.on(element, event, phase, Listener::Host(id));
        id
    }

    /// Remove a host listener. Returns false if it was already gone.
    pub fn unlisten(&mut self, id: HostListenerId) -> bool {
        let Some(slot) = self
            .host_handlers
            .get_mut(id.0 as usize)
            .and_then(Option::take)
        else {
            return false;
        };
        self.listeners
            .off(slot.element, slot.event, |l| *l == Listener::Host(id))
            > 0
    }

    fn run_host(&mut self, id: HostListenerId, info: &EventInfo) -> Outcome {
        let idx = id.0 as usize;
        let Some(mut callback) = self
            .host_handlers
            .get_mut(idx)
            .and_then(Option::as_mut)
            .and_then(|slot| slot.callback.take())
        else {
            return Outcome::Continue;
        };
        let outcome = callback(self, info);
        if let Some(slot) = self.host_handlers.get_mut(idx).and_then(Option::as_mut) {
            slot.callback = Some(callback);
        }
        outcome
    }

    /// Drop host slots whose registration was removed in bulk.
    ///
    /// Scans every slot ever handed out, including dead ones, so the cost grows with the
    /// number of `listen` calls over the page's lifetime. It is paid on outside clicks,
    /// on disables and on teardown.
    pub(crate) fn prune_host_handlers(&mut self) {
        let listeners = &self.listeners;
        for (idx, slot) in self.host_handlers.iter_mut().enumerate() {
            let id = HostListenerId(handle_index(idx));
            let orphaned = slot.as_ref().is_some_and(|s| {
                !listeners.contains(s.element, s.event, |l| *l == Listener::Host(id))
            });
            if orphaned {
                *slot = None;
            }
        }
    }

    /// Number of listeners on `element` for `event`, host and dropdown alike.
    pub fn listener_count(&self, element: ElementId, event: EventType) -> usize {
        self.listeners.count(element, event)
    }

    // --- document writes that listeners care about ---

    /// Set an attribute, notifying dropdowns that observe it.
    ///
    /// Writing `tab-alive` on a trigger bound with `tab_alive` enables or disables it.
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.document.set_attribute(element, name, value);
        let observers: Vec<DropdownId> = self
            .bound()
            .filter(|&id| self.dropdown(id).is_some_and(|d| d.observes(element, name)))
            .collect();
        for id in observers {
            self.apply_tab_alive(id, value);
        }
    }

    /// Remove an element with its subtree and every listener registered on it.
    pub fn remove_element(&mut self, element: ElementId) {
        if !self.document.is_alive(element) || element == self.document.root() {
            return;
        }
        let doomed: Vec<ElementId> = core::iter::once(element)
            .chain(self.document.descendants(element))
            .collect();
        for id in doomed {
            self.listeners.clear_node(id);
        }
        self.prune_host_handlers();
        self.document.remove(element);
    }

    // --- broadcasts and instances ---

    /// Deliver `msg` to every bound dropdown, in bind order.
    pub fn broadcast(&mut self, msg: &Broadcast) {
        let ids: Vec<DropdownId> = self.bound().collect();
        for id in ids {
            self.receive(id, msg);
        }
    }

    /// Take the queued outbound broadcasts.
    pub fn drain_broadcasts(&mut self) -> Vec<Broadcast> {
        core::mem::take(&mut self.outbox)
    }

    /// Ids of bound dropdowns, in bind order.
    pub fn bound(&self) -> impl Iterator<Item = DropdownId> + '_ {
        self.dropdowns.iter().enumerate().filter_map(|(idx, d)| {
            d.as_ref()?;
            Some(DropdownId(handle_index(idx)))
        })
    }

    /// A bound dropdown.
    pub fn dropdown(&self, id: DropdownId) -> Option<&Dropdown> {
        self.dropdowns.get(id.0 as usize)?.as_ref()
    }

    /// Returns true if the dropdown's menu is shown.
    pub fn is_open(&self, id: DropdownId) -> bool {
        self.dropdown(id)
            .is_some_and(|d| self.document.is_shown(d.menu()))
    }

    /// Returns true if the dropdown's trigger responds to clicks.
    pub fn is_enabled(&self, id: DropdownId) -> bool {
        self.dropdown(id).is_some_and(Dropdown::is_enabled)
    }
}

/// Mutable access to a bound dropdown in `slots`.
///
/// A free function so callers can hold it alongside other fields of [`Page`].
pub(crate) fn slot_mut(slots: &mut [Option<Dropdown>], id: DropdownId) -> Option<&mut Dropdown> {
    slots.get_mut(id.0 as usize)?.as_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use understory_element_tree::Element;

    fn nested() -> (Page, ElementId, ElementId) {
        let mut page = Page::new();
        let body = page.document().body();
        let outer = page.document_mut().insert(Some(body), Element::new("div"));
        let inner = page.document_mut().insert(Some(outer), Element::new("span"));
        (page, outer, inner)
    }

    #[test]
    fn host_listeners_see_capture_target_bubble() {
        let (mut page, outer, inner) = nested();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (el, phase) in [
            (outer, ListenPhase::Capture),
            (inner, ListenPhase::Bubble),
            (outer, ListenPhase::Bubble),
        ] {
            let log = log.clone();
            page.listen(el, EventType::Click, phase, move |_, info| {
                log.borrow_mut().push((info.current, info.phase));
                Outcome::Continue
            });
        }
        assert_eq!(page.click(inner), None);
        assert_eq!(
            *log.borrow(),
            vec![
                (outer, Phase::Capture),
                (inner, Phase::Target),
                (outer, Phase::Bubble),
            ]
        );
    }

    #[test]
    fn stop_finishes_current_element_then_halts() {
        let (mut page, outer, inner) = nested();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        page.listen(inner, EventType::Click, ListenPhase::Bubble, |_, _| Outcome::Stop);
        page.listen(inner, EventType::Click, ListenPhase::Bubble, move |_, _| {
            *h.borrow_mut() += 1;
            Outcome::Continue
        });
        let h = hits.clone();
        page.listen(outer, EventType::Click, ListenPhase::Bubble, move |_, _| {
            *h.borrow_mut() += 10;
            Outcome::Continue
        });
        assert_eq!(page.click(inner), Some(inner));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn unlisten_and_remove_element_drop_registrations() {
        let (mut page, outer, inner) = nested();
        let a = page.listen(inner, EventType::KeyUp, ListenPhase::Bubble, |_, _| {
            Outcome::Continue
        });
        let b = page.listen(outer, EventType::Click, ListenPhase::Bubble, |_, _| {
            Outcome::Continue
        });
        assert!(page.unlisten(a));
        assert!(!page.unlisten(a));
        assert_eq!(page.listener_count(inner, EventType::KeyUp), 0);

        page.remove_element(outer);
        assert!(!page.document().is_alive(inner));
        assert_eq!(page.listener_count(outer, EventType::Click), 0);
        assert!(!page.unlisten(b), "slot went with the element");
    }

    #[test]
    fn host_listener_ids_are_not_reused() {
        let (mut page, _, inner) = nested();
        let hits = Rc::new(RefCell::new(0));
        let first = page.listen(inner, EventType::Click, ListenPhase::Bubble, |_, _| {
            Outcome::Continue
        });
        assert!(page.unlisten(first));
        let h = hits.clone();
        let second = page.listen(inner, EventType::Click, ListenPhase::Bubble, move |_, _| {
            *h.borrow_mut() += 1;
            Outcome::Continue
        });
        assert_ne!(first, second);
        assert!(!page.unlisten(first), "stale id stays dead");
        page.click(inner);
        assert_eq!(*hits.borrow(), 1);
        assert!(page.unlisten(second));
    }

    #[test]
    fn listeners_may_unregister_themselves() {
        let (mut page, _, inner) = nested();
        let calls = Rc::new(RefCell::new(0));
        let c = calls.clone();
        let id = Rc::new(RefCell::new(None));
        let own = id.clone();
        let registered = page.listen(inner, EventType::Click, ListenPhase::Bubble, move |page, _| {
            *c.borrow_mut() += 1;
            if let Some(me) = *own.borrow() {
                page.unlisten(me);
            }
            Outcome::Continue
        });
        *id.borrow_mut() = Some(registered);
        page.click(inner);
        page.click(inner);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(page.listener_count(inner, EventType::Click), 0);
    }

    #[test]
    fn stale_targets_and_empty_points() {
        let (mut page, outer, _) = nested();
        page.remove_element(outer);
        assert_eq!(page.click(outer), None);
        // Nothing has bounds, so the click lands on the root and runs through.
        assert_eq!(page.click_at(Point::new(5.0, 5.0)), None);
    }
}
