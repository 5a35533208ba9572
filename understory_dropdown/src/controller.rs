// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown behavior: binding, toggling, outside clicks, enable/disable, and teardown.

use alloc::string::String;

use kurbo::Point;
use smallvec::SmallVec;
use tracing::debug;
use understory_element_tree::{ElementId, Position};
use understory_event_route::types::{ListenPhase, Outcome};

use crate::broadcast::Broadcast;
use crate::callbacks::Callbacks;
use crate::config::{DropdownConfig, attr};
use crate::error::DropdownError;
use crate::page::{DropdownId, EventType, Listener, Page, handle_index, slot_mut};

/// Vertical gap between the trigger's bottom edge and an automatically positioned menu.
pub const MENU_GAP: f64 = 5.0;

/// State of one bound dropdown.
#[derive(Debug)]
pub struct Dropdown {
    trigger: ElementId,
    menu: ElementId,
    handlers: SmallVec<[ElementId; 2]>,
    config: DropdownConfig,
    callbacks: Callbacks,
    /// Trigger `value` snapshot taken on open.
    memory: Option<String>,
    relocated: bool,
    enabled: bool,
}

impl Dropdown {
    /// The trigger element.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// The menu element (the trigger's next sibling at bind time).
    pub fn menu(&self) -> ElementId {
        self.menu
    }

    /// Handler elements found in the trigger's parent at bind time.
    pub fn handlers(&self) -> &[ElementId] {
        &self.handlers
    }

    /// Bind-time configuration.
    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }

    /// The `value` recorded on open, if any.
    pub fn memory(&self) -> Option<&str> {
        self.memory.as_deref()
    }

    /// Returns true if the menu was moved under `body`.
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Returns true if trigger clicks toggle the menu.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn observes(&self, element: ElementId, name: &str) -> bool {
        self.config.tab_alive && self.trigger == element && name == attr::TAB_ALIVE
    }
}

impl Page {
    /// Bind a dropdown to `trigger`, reading its configuration from attributes.
    ///
    /// The menu is the trigger's next sibling.
    pub fn bind_dropdown(
        &mut self,
        trigger: ElementId,
        callbacks: Callbacks,
    ) -> Result<DropdownId, DropdownError> {
        let config = DropdownConfig::from_element(&self.document, trigger)?;
        self.bind_dropdown_with(trigger, config, callbacks)
    }

    /// Bind a dropdown to `trigger` with an explicit configuration.
    ///
    /// The menu is hidden. With automatic positioning it moves under `body` and becomes
    /// absolutely positioned where it was. If `tab-alive` is observed and present on the
    /// trigger, its current value is applied.
    pub fn bind_dropdown_with(
        &mut self,
        trigger: ElementId,
        config: DropdownConfig,
        callbacks: Callbacks,
    ) -> Result<DropdownId, DropdownError> {
        let doc = &mut self.document;
        if !doc.is_alive(trigger) {
            return Err(DropdownError::StaleElement(trigger));
        }
        let menu = doc
            .next_sibling(trigger)
            .ok_or(DropdownError::MissingMenu(trigger))?;
        let handlers: SmallVec<[ElementId; 2]> = doc
            .parent_of(trigger)
            .map(|parent| doc.query_all(parent, &config.classes.handler_selector))
            .unwrap_or_default()
            .into_iter()
            .filter(|&h| h != trigger)
            .collect();

        doc.hide(menu);
        let mut relocated = false;
        if config.automatic_position {
            let at = doc.offset(menu).unwrap_or(Point::ZERO);
            let body = doc.body();
            relocated = doc.append_child(body, menu);
            doc.set_position(
                menu,
                Position::Absolute {
                    top: at.y,
                    left: at.x,
                },
            );
        }

        let id = DropdownId(handle_index(self.dropdowns.len()));
        let click = EventType::Click;
        self.listeners
            .on(trigger, click, ListenPhase::Bubble, Listener::Trigger(id));
        for &handler in &handlers {
            self.listeners
                .on(handler, click, ListenPhase::Bubble, Listener::Handler(id));
        }
        self.listeners
            .on(menu, click, ListenPhase::Bubble, Listener::Menu(id));

        let initial = config
            .tab_alive
            .then(|| self.document.attribute(trigger, attr::TAB_ALIVE))
            .flatten()
            .map(String::from);
        debug!(
            dropdown = id.0,
            ?trigger,
            ?menu,
            handlers = handlers.len(),
            relocated,
            "bind"
        );
        self.dropdowns.push(Some(Dropdown {
            trigger,
            menu,
            handlers,
            config,
            callbacks,
            memory: None,
            relocated,
            enabled: true,
        }));
        if let Some(value) = initial {
            self.apply_tab_alive(id, &value);
        }
        Ok(id)
    }

    /// Tear down a dropdown.
    ///
    /// A relocated menu is removed from the document. Every click and key-up listener on the
    /// trigger goes, along with the listeners this dropdown registered elsewhere.
    pub fn destroy(&mut self, id: DropdownId) -> Result<(), DropdownError> {
        let dd = self
            .dropdowns
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(DropdownError::UnknownDropdown(id))?;
        if dd.relocated {
            self.remove_element(dd.menu);
        }
        self.listeners.off_all(dd.trigger, EventType::Click);
        self.listeners.off_all(dd.trigger, EventType::KeyUp);
        self.listeners.retain(|_, _, l| l.dropdown() != Some(id));
        self.prune_host_handlers();
        debug!(dropdown = id.0, "destroy");
        Ok(())
    }

    /// Toggle the menu as if the trigger were clicked, without flipping indicators.
    ///
    /// Opening first clicks the document root so other open dropdowns close.
    pub fn toggle(&mut self, id: DropdownId) {
        let Some(dd) = self.dropdown(id) else {
            return;
        };
        let (menu, automatic) = (dd.menu, dd.config.automatic_position);
        if !self.document.is_shown(menu) {
            let root = self.document.root();
            self.click(root);
        }
        // A host listener may have torn this dropdown down during that click.
        if self.dropdown(id).is_none() {
            return;
        }
        if automatic {
            self.place_menu(id);
        }
        let shown = self.document.toggle_visibility(menu);
        let root = self.document.root();
        self.listeners
            .off(root, EventType::Click, |l| *l == Listener::Outside(id));
        if shown {
            self.listeners
                .on(root, EventType::Click, ListenPhase::Bubble, Listener::Outside(id));
            self.open_transition(id);
        } else {
            self.close_transition(id);
        }
    }

    pub(crate) fn on_trigger_click(&mut self, id: DropdownId) -> Outcome {
        self.toggle(id);
        self.flip_indicators(id);
        Outcome::Stop
    }

    pub(crate) fn on_handler_click(&mut self, id: DropdownId) -> Outcome {
        self.flip_indicators(id);
        self.toggle(id);
        Outcome::Stop
    }

    /// Put the menu right under the trigger.
    fn place_menu(&mut self, id: DropdownId) {
        let Some(dd) = self.dropdown(id) else {
            return;
        };
        let (trigger, menu) = (dd.trigger, dd.menu);
        let doc = &mut self.document;
        let (Some(at), Some(height)) = (doc.offset(trigger), doc.height(trigger)) else {
            return;
        };
        let top = at.y + height + MENU_GAP;
        doc.set_position(menu, Position::Absolute { top, left: at.x });
    }

    fn open_transition(&mut self, id: DropdownId) {
        let Self {
            document,
            dropdowns,
            scope,
            ..
        } = self;
        let Some(dd) = slot_mut(dropdowns, id) else {
            return;
        };
        document.add_class(dd.trigger, &dd.config.classes.open);
        dd.memory = document.attribute(dd.trigger, attr::VALUE).map(String::from);
        debug!(dropdown = id.0, memory = ?dd.memory, "open");
        scope.safe_apply(|| dd.callbacks.fire_open());
        if let Some(selector) = &dd.config.focus_on_open
            && let Some(target) = document.query_first(dd.menu, selector)
        {
            document.focus(target);
        }
    }

    fn close_transition(&mut self, id: DropdownId) {
        let Self {
            document,
            dropdowns,
            scope,
            ..
        } = self;
        let Some(dd) = slot_mut(dropdowns, id) else {
            return;
        };
        document.remove_class(dd.trigger, &dd.config.classes.open);
        let changed = document.attribute(dd.trigger, attr::VALUE) != dd.memory.as_deref();
        debug!(dropdown = id.0, changed, "close");
        if changed {
            scope.safe_apply(|| {
                dd.memory = None;
                dd.callbacks.fire_close();
            });
        }
    }

    /// Close path for clicks outside the trigger and menu.
    pub(crate) fn on_outside_click(&mut self, id: DropdownId) {
        let Some(dd) = self.dropdown(id) else {
            return;
        };
        let (trigger, menu) = (dd.trigger, dd.menu);
        let closed_id = dd.config.drop_down_id.clone();
        if !self.document.is_shown(menu) {
            return;
        }
        self.document.hide(menu);
        let root = self.document.root();
        self.listeners
            .off(root, EventType::Click, |l| *l == Listener::Outside(id));
        self.listeners.off_all(trigger, EventType::KeyUp);
        self.prune_host_handlers();
        self.flip_indicators(id);
        debug!(dropdown = id.0, id = ?closed_id, "outside click");
        self.outbox
            .push(Broadcast::OutsideClickClosed { id: closed_id });
        self.close_transition(id);
    }

    fn flip_indicators(&mut self, id: DropdownId) {
        let Some(dd) = slot_mut(&mut self.dropdowns, id) else {
            return;
        };
        for &handler in &dd.handlers {
            for class in &dd.config.classes.indicator {
                self.document.toggle_class(handler, class);
            }
        }
    }

    /// React to a page-wide message.
    pub(crate) fn receive(&mut self, id: DropdownId, msg: &Broadcast) {
        match msg {
            Broadcast::CloseDropDown { id: target } => {
                let matches = self
                    .dropdown(id)
                    .and_then(|d| d.config.drop_down_id.as_deref())
                    == Some(target.as_str());
                if matches {
                    self.on_outside_click(id);
                }
            }
            Broadcast::ClickOutside => {
                let shown = self
                    .dropdown(id)
                    .is_some_and(|d| self.document.is_shown(d.menu));
                if shown {
                    self.on_outside_click(id);
                } else {
                    self.close_transition(id);
                }
            }
            Broadcast::OutsideClickClosed { .. } => {}
        }
    }

    /// Apply an observed `tab-alive` value.
    ///
    /// Re-enabling binds the regular trigger listener, so clicks on a re-enabled trigger also
    /// flip the indicator classes, as they do after the initial bind. Disabling removes every
    /// click listener on the trigger, host ones included.
    pub(crate) fn apply_tab_alive(&mut self, id: DropdownId, value: &str) {
        let Some(dd) = slot_mut(&mut self.dropdowns, id) else {
            return;
        };
        let trigger = dd.trigger;
        let enable = value == "true";
        dd.enabled = enable;
        if enable {
            let bound = self
                .listeners
                .contains(trigger, EventType::Click, |l| *l == Listener::Trigger(id));
            if !bound {
                self.listeners.on(
                    trigger,
                    EventType::Click,
                    ListenPhase::Bubble,
                    Listener::Trigger(id),
                );
            }
            self.document
                .remove_class(trigger, &dd.config.classes.disabled);
        } else {
            self.listeners.off_all(trigger, EventType::Click);
            self.document.add_class(trigger, &dd.config.classes.disabled);
            self.prune_host_handlers();
        }
        debug!(dropdown = id.0, enable, "tab-alive");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use kurbo::Rect;
    use understory_element_tree::{Element, Selector};

    const OPEN: &str = "drop-down-open";
    const DOWN: &str = "banana-arrow-down5";
    const UP: &str = "banana-arrow-up5";

    struct Fixture {
        page: Page,
        trigger: ElementId,
        menu: ElementId,
        item: ElementId,
        handler: ElementId,
        outside: ElementId,
    }

    /// `body > div.wrap > [trigger, ul.menu > li, span.open-drop-down]` plus `body > p`.
    ///
    /// The wrapper sits at (20, 30); the trigger is 100x24 at (10, 5) inside it.
    fn fixture(trigger: Element) -> Fixture {
        let mut page = Page::new();
        let body = page.document().body();
        let doc = page.document_mut();
        let wrap = doc.insert(
            Some(body),
            Element::new("div").with_bounds(Rect::new(20.0, 30.0, 320.0, 230.0)),
        );
        let trigger = doc.insert(
            Some(wrap),
            trigger.with_bounds(Rect::new(10.0, 5.0, 110.0, 29.0)),
        );
        let menu = doc.insert(
            Some(wrap),
            Element::new("ul")
                .with_class("menu")
                .with_bounds(Rect::new(10.0, 40.0, 150.0, 140.0)),
        );
        let item = doc.insert(Some(menu), Element::new("li"));
        let handler = doc.insert(
            Some(wrap),
            Element::new("span")
                .with_class("open-drop-down")
                .with_class(DOWN),
        );
        let outside = doc.insert(Some(body), Element::new("p"));
        Fixture {
            page,
            trigger,
            menu,
            item,
            handler,
            outside,
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn bind_hides_menu_and_finds_handlers() {
        let mut f = fixture(Element::new("button"));
        f.page.document_mut().show(f.menu);
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        let dd = f.page.dropdown(id).unwrap();
        assert_eq!(dd.menu(), f.menu);
        assert_eq!(dd.handlers(), &[f.handler]);
        assert!(!dd.is_relocated());
        assert!(dd.is_enabled());
        assert!(!f.page.document().is_shown(f.menu));
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn bind_errors() {
        let mut f = fixture(Element::new("button"));
        let body = f.page.document().body();
        let last = f.page.document_mut().insert(Some(body), Element::new("button"));
        assert_eq!(
            f.page.bind_dropdown(last, Callbacks::new()).unwrap_err(),
            DropdownError::MissingMenu(last)
        );
        f.page.remove_element(last);
        assert_eq!(
            f.page.bind_dropdown(last, Callbacks::new()).unwrap_err(),
            DropdownError::StaleElement(last)
        );
        f.page
            .document_mut()
            .set_attribute(f.trigger, attr::FOCUS_ON_OPEN, "[oops");
        assert!(matches!(
            f.page.bind_dropdown(f.trigger, Callbacks::new()),
            Err(DropdownError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn click_parity_decides_visibility() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        for n in 1..=6 {
            assert_eq!(f.page.click(f.trigger), Some(f.trigger));
            assert_eq!(f.page.is_open(id), n % 2 == 1, "after {n} clicks");
        }
    }

    #[test]
    fn open_class_follows_transitions() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.click(f.trigger);
        assert!(f.page.document().has_class(f.trigger, OPEN));
        f.page.click(f.outside);
        assert!(!f.page.document().has_class(f.trigger, OPEN));
        f.page.click(f.handler);
        assert!(f.page.is_open(id));
        assert!(f.page.document().has_class(f.trigger, OPEN));
        f.page.click(f.handler);
        assert!(!f.page.is_open(id));
        assert!(!f.page.document().has_class(f.trigger, OPEN));
    }

    #[test]
    fn automatic_position_places_menu_under_trigger() {
        let mut f = fixture(Element::new("button").with_attribute(attr::AUTOMATIC_POSITION, ""));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        let body = f.page.document().body();
        assert!(f.page.dropdown(id).unwrap().is_relocated());
        assert_eq!(f.page.document().parent_of(f.menu), Some(body));
        assert_eq!(
            f.page.document().position(f.menu),
            Some(Position::Absolute {
                top: 70.0,
                left: 30.0
            }),
            "relocated menu keeps its pre-move offset"
        );

        f.page.click(f.trigger);
        // Trigger sits at (30, 35) and is 24 high.
        assert_eq!(
            f.page.document().offset(f.menu),
            Some(Point::new(30.0, 35.0 + 24.0 + MENU_GAP))
        );

        f.page.click(f.trigger);
        f.page
            .document_mut()
            .set_local_bounds(f.trigger, Rect::new(50.0, 60.0, 150.0, 100.0));
        f.page.click(f.trigger);
        assert_eq!(
            f.page.document().position(f.menu),
            Some(Position::Absolute {
                top: 90.0 + 40.0 + MENU_GAP,
                left: 70.0
            })
        );
    }

    #[test]
    fn on_close_fires_only_when_value_changed() {
        let mut f = fixture(Element::new("button").with_attribute(attr::VALUE, "a"));
        let (opened, on_open) = counter();
        let (closed, on_close) = counter();
        let id = f
            .page
            .bind_dropdown(
                f.trigger,
                Callbacks::new().on_open(on_open).on_close(on_close),
            )
            .unwrap();

        f.page.click(f.trigger);
        assert_eq!(f.page.dropdown(id).unwrap().memory(), Some("a"));
        f.page.click(f.trigger);
        assert_eq!((opened.get(), closed.get()), (1, 0));

        f.page.click(f.trigger);
        f.page.set_attribute(f.trigger, attr::VALUE, "b");
        f.page.click(f.outside);
        assert_eq!((opened.get(), closed.get()), (2, 1));
        assert_eq!(f.page.dropdown(id).unwrap().memory(), None);
    }

    #[test]
    fn close_requests_match_on_id() {
        let mut f = fixture(Element::new("button").with_attribute(attr::DROP_DOWN_ID, "alpha"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.click(f.trigger);

        f.page.broadcast(&Broadcast::close("beta"));
        assert!(f.page.is_open(id));
        assert!(f.page.drain_broadcasts().is_empty());

        f.page.broadcast(&Broadcast::close("alpha"));
        assert!(!f.page.is_open(id));
        assert!(!f.page.document().has_class(f.trigger, OPEN));
        assert_eq!(
            f.page.drain_broadcasts(),
            vec![Broadcast::OutsideClickClosed {
                id: Some(String::from("alpha"))
            }]
        );
        let root = f.page.document().root();
        assert_eq!(f.page.listener_count(root, EventType::Click), 0);
    }

    #[test]
    fn destroy_removes_relocated_menu() {
        let mut f = fixture(Element::new("button").with_attribute(attr::AUTOMATIC_POSITION, ""));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.click(f.trigger);
        f.page.destroy(id).unwrap();
        assert!(!f.page.document().is_alive(f.menu));
        assert!(!f.page.document().is_alive(f.item));
        let root = f.page.document().root();
        assert_eq!(f.page.listener_count(root, EventType::Click), 0);
        assert_eq!(
            f.page.destroy(id).unwrap_err(),
            DropdownError::UnknownDropdown(id)
        );
    }

    #[test]
    fn destroy_keeps_static_menu_but_detaches_listeners() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.listen(f.trigger, EventType::KeyUp, ListenPhase::Bubble, |_, _| {
            Outcome::Continue
        });
        f.page.destroy(id).unwrap();

        assert!(f.page.document().is_alive(f.menu));
        for el in [f.trigger, f.menu, f.handler] {
            assert_eq!(f.page.listener_count(el, EventType::Click), 0);
        }
        assert_eq!(f.page.listener_count(f.trigger, EventType::KeyUp), 0);
        assert_eq!(f.page.click(f.trigger), None);
        assert!(!f.page.document().is_shown(f.menu));
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn clicks_inside_menu_keep_it_open() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.click(f.trigger);
        assert_eq!(f.page.click(f.item), Some(f.menu));
        assert!(f.page.is_open(id));
        assert_eq!(f.page.click(f.outside), None);
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn clicks_inside_relocated_menu_keep_it_open() {
        let mut f = fixture(Element::new("button").with_attribute(attr::AUTOMATIC_POSITION, ""));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.click(f.trigger);
        // The item has no size of its own, so this point lands on the menu.
        assert_eq!(f.page.click_at(Point::new(35.0, 70.0)), Some(f.menu));
        assert!(f.page.is_open(id));
        f.page.click_at(Point::new(500.0, 500.0));
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn opening_one_dropdown_closes_another() {
        let mut f = fixture(Element::new("button").with_attribute(attr::DROP_DOWN_ID, "first"));
        let body = f.page.document().body();
        let doc = f.page.document_mut();
        let other = doc.insert(Some(body), Element::new("button"));
        let _other_menu = doc.insert(Some(body), Element::new("ul"));

        let a = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        let b = f.page.bind_dropdown(other, Callbacks::new()).unwrap();
        f.page.click(f.trigger);
        assert!(f.page.is_open(a));

        f.page.click(other);
        assert!(!f.page.is_open(a));
        assert!(f.page.is_open(b));
        assert_eq!(
            f.page.drain_broadcasts(),
            vec![Broadcast::OutsideClickClosed {
                id: Some(String::from("first"))
            }]
        );
        let root = f.page.document().root();
        assert_eq!(f.page.listener_count(root, EventType::Click), 1);
    }

    #[test]
    fn tab_alive_enables_and_disables() {
        let mut f = fixture(Element::new("button").with_attribute(attr::TAB_ALIVE, "false"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        assert!(!f.page.is_enabled(id));
        assert!(f.page.document().has_class(f.trigger, "disabled_element"));
        f.page.click(f.trigger);
        assert!(!f.page.is_open(id));

        f.page.set_attribute(f.trigger, attr::TAB_ALIVE, "true");
        f.page.set_attribute(f.trigger, attr::TAB_ALIVE, "true");
        assert!(f.page.is_enabled(id));
        assert!(!f.page.document().has_class(f.trigger, "disabled_element"));
        assert_eq!(f.page.listener_count(f.trigger, EventType::Click), 1);
        f.page.click(f.trigger);
        assert!(f.page.is_open(id));

        f.page.set_attribute(f.trigger, attr::TAB_ALIVE, "0");
        assert!(f.page.document().has_class(f.trigger, "disabled_element"));
        assert_eq!(f.page.listener_count(f.trigger, EventType::Click), 0);
        // The handler element still works while the trigger is disabled.
        f.page.click(f.handler);
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn reenabled_trigger_flips_indicators() {
        let mut f = fixture(Element::new("button").with_attribute(attr::TAB_ALIVE, "false"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.set_attribute(f.trigger, attr::TAB_ALIVE, "true");
        f.page.click(f.trigger);
        assert!(f.page.is_open(id));
        assert!(f.page.document().has_class(f.handler, UP));
        assert!(!f.page.document().has_class(f.handler, DOWN));
    }

    #[test]
    fn tab_alive_is_ignored_when_not_observed() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.set_attribute(f.trigger, attr::TAB_ALIVE, "false");
        assert!(f.page.is_enabled(id));
        f.page.click(f.trigger);
        assert!(f.page.is_open(id));
    }

    #[test]
    fn hooks_join_running_cycle() {
        let mut f = fixture(Element::new("button"));
        let (opened, on_open) = counter();
        f.page
            .bind_dropdown(f.trigger, Callbacks::new().on_open(on_open))
            .unwrap();

        assert_eq!(f.page.scope().cycles(), 0);
        f.page.click(f.trigger);
        assert_eq!(f.page.scope().cycles(), 1, "idle open starts a cycle");
        f.page.click(f.trigger);
        assert_eq!(f.page.scope().cycles(), 1, "unchanged close runs no hook");

        let trigger = f.trigger;
        f.page.apply(|page| {
            page.click(trigger);
            page.click(trigger);
            page.click(trigger);
            assert!(page.scope().in_progress());
        });
        assert_eq!(f.page.scope().cycles(), 2);
        assert_eq!(opened.get(), 3);
    }

    #[test]
    fn focus_on_open_focuses_first_match() {
        let mut f = fixture(Element::new("button").with_attribute(attr::FOCUS_ON_OPEN, "input.search"));
        let doc = f.page.document_mut();
        let first = doc.insert(
            Some(f.item),
            Element::new("input").with_class("search").focusable(),
        );
        let _second = doc.insert(
            Some(f.menu),
            Element::new("input").with_class("search").focusable(),
        );
        f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        assert_eq!(f.page.document().focused(), None);
        f.page.click(f.trigger);
        assert_eq!(f.page.document().focused(), Some(first));
    }

    #[test]
    fn indicators_flip_around_toggles() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        let has = |page: &Page, class| page.document().has_class(f.handler, class);

        f.page.click(f.trigger);
        assert!(has(&f.page, UP) && !has(&f.page, DOWN));
        f.page.click(f.handler);
        assert!(!f.page.is_open(id));
        assert!(has(&f.page, DOWN) && !has(&f.page, UP));

        f.page.click(f.trigger);
        f.page.click(f.outside);
        assert!(has(&f.page, DOWN), "outside click flips back");
    }

    #[test]
    fn click_outside_broadcast_keeps_menu_and_class_in_step() {
        let mut f = fixture(Element::new("button").with_attribute(attr::VALUE, "x"));
        let (closed, on_close) = counter();
        let id = f
            .page
            .bind_dropdown(f.trigger, Callbacks::new().on_close(on_close))
            .unwrap();
        let root = f.page.document().root();
        let in_step = |page: &Page| {
            page.document().is_shown(f.menu) == page.document().has_class(f.trigger, OPEN)
        };

        f.page.click(f.trigger);
        f.page.set_attribute(f.trigger, attr::VALUE, "y");
        f.page.broadcast(&Broadcast::ClickOutside);
        assert!(in_step(&f.page));
        assert!(!f.page.is_open(id));
        assert_eq!(f.page.listener_count(root, EventType::Click), 0);
        assert!(f.page.document().has_class(f.handler, DOWN));
        assert_eq!(closed.get(), 1);

        // Already closed: nothing flips.
        f.page.broadcast(&Broadcast::ClickOutside);
        assert!(in_step(&f.page));
        assert!(f.page.document().has_class(f.handler, DOWN));

        f.page.click(f.trigger);
        assert!(f.page.is_open(id));
        assert!(in_step(&f.page));
    }

    #[test]
    fn outside_click_drops_trigger_key_listeners() {
        let mut f = fixture(Element::new("button"));
        let presses = Rc::new(Cell::new(0));
        let p = presses.clone();
        f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page
            .listen(f.trigger, EventType::KeyUp, ListenPhase::Bubble, move |_, _| {
                p.set(p.get() + 1);
                Outcome::Continue
            });
        f.page.key_up(f.trigger);
        f.page.click(f.trigger);
        f.page.click(f.outside);
        f.page.key_up(f.trigger);
        assert_eq!(presses.get(), 1);
        assert_eq!(f.page.listener_count(f.trigger, EventType::KeyUp), 0);
    }

    #[test]
    fn programmatic_toggle_skips_indicators() {
        let mut f = fixture(Element::new("button"));
        let id = f.page.bind_dropdown(f.trigger, Callbacks::new()).unwrap();
        f.page.toggle(id);
        assert!(f.page.is_open(id));
        assert!(f.page.document().has_class(f.handler, DOWN));
        f.page.toggle(id);
        assert!(!f.page.is_open(id));
    }

    #[test]
    fn builder_config_binds_without_attributes() {
        let mut f = fixture(Element::new("button"));
        let config = DropdownConfig::default()
            .with_drop_down_id("built")
            .with_focus_on_open(Selector::parse("li").unwrap());
        let id = f
            .page
            .bind_dropdown_with(f.trigger, config, Callbacks::new())
            .unwrap();
        f.page.click(f.trigger);
        f.page.broadcast(&Broadcast::close("built"));
        assert!(!f.page.is_open(id));
        let ids: Vec<DropdownId> = f.page.bound().collect();
        assert_eq!(ids, vec![id]);
    }
}
