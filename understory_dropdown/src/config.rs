// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bind-time configuration: recognized attributes and the class contract.

use alloc::string::String;

use understory_element_tree::{Document, ElementId, Selector};

use crate::error::DropdownError;

/// Attribute names read from the trigger element.
pub mod attr {
    /// Presence relocates the menu under `body` and positions it under the trigger on open.
    pub const AUTOMATIC_POSITION: &str = "automatic-position";
    /// Selector for the element inside the menu that receives focus on open.
    pub const FOCUS_ON_OPEN: &str = "focus-on-open";
    /// Hover target selector. Stored only.
    pub const HOVER_ON_OPEN: &str = "hover-on-open";
    /// Instance identifier matched by close requests.
    pub const DROP_DOWN_ID: &str = "drop-down-id";
    /// Observed enable flag. `"true"` enables; anything else disables.
    pub const TAB_ALIVE: &str = "tab-alive";
    /// Trigger value compared between open and close.
    pub const VALUE: &str = "value";
}

/// Class names and selectors the controller applies to the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownClasses {
    /// Added to the trigger while the menu is open.
    pub open: String,
    /// Added to the trigger while it is disabled.
    pub disabled: String,
    /// Indicator pair toggled together on handler elements.
    pub indicator: [String; 2],
    /// Matches handler elements inside the trigger's parent.
    pub handler_selector: Selector,
}

impl Default for DropdownClasses {
    fn default() -> Self {
        Self {
            open: String::from("drop-down-open"),
            disabled: String::from("disabled_element"),
            indicator: [
                String::from("banana-arrow-down5"),
                String::from("banana-arrow-up5"),
            ],
            handler_selector: Selector::any_class([
                "open-drop-down",
                "open_drop_down_for_workbasket",
            ]),
        }
    }
}

/// Configuration of one dropdown, fixed at bind time.
#[derive(Clone, Debug, Default)]
pub struct DropdownConfig {
    /// Relocate and absolutely position the menu.
    pub automatic_position: bool,
    /// First match inside the menu gets focus on open.
    pub focus_on_open: Option<Selector>,
    /// Hover target. Exposed to hosts, otherwise unused.
    pub hover_on_open: Option<String>,
    /// Identifier matched by [`Broadcast::CloseDropDown`](crate::Broadcast::CloseDropDown).
    pub drop_down_id: Option<String>,
    /// Whether the `tab-alive` attribute is observed.
    pub tab_alive: bool,
    /// Class contract.
    pub classes: DropdownClasses,
}

impl DropdownConfig {
    /// Read the configuration from the trigger's attributes.
    ///
    /// Empty `focus-on-open`, `hover-on-open`, and `drop-down-id` values count as absent.
    ///
    /// ```
    /// use understory_dropdown::DropdownConfig;
    /// use understory_element_tree::{Document, Element};
    ///
    /// let mut doc = Document::new();
    /// let trigger = doc.insert(
    ///     Some(doc.body()),
    ///     Element::new("button")
    ///         .with_attribute("automatic-position", "")
    ///         .with_attribute("drop-down-id", "filters")
    ///         .with_attribute("focus-on-open", "input.search"),
    /// );
    ///
    /// let config = DropdownConfig::from_element(&doc, trigger).unwrap();
    /// assert!(config.automatic_position);
    /// assert_eq!(config.drop_down_id.as_deref(), Some("filters"));
    /// assert_eq!(config.focus_on_open.unwrap().as_str(), "input.search");
    /// assert!(!config.tab_alive);
    /// ```
    pub fn from_element(doc: &Document, trigger: ElementId) -> Result<Self, DropdownError> {
        if !doc.is_alive(trigger) {
            return Err(DropdownError::StaleElement(trigger));
        }
        let non_empty = |name: &str| {
            doc.attribute(trigger, name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let focus_on_open = non_empty(attr::FOCUS_ON_OPEN)
            .map(Selector::parse)
            .transpose()
            .map_err(|source| DropdownError::InvalidSelector {
                attribute: attr::FOCUS_ON_OPEN,
                source,
            })?;
        Ok(Self {
            automatic_position: doc.has_attribute(trigger, attr::AUTOMATIC_POSITION),
            focus_on_open,
            hover_on_open: non_empty(attr::HOVER_ON_OPEN).map(String::from),
            drop_down_id: non_empty(attr::DROP_DOWN_ID).map(String::from),
            tab_alive: doc.has_attribute(trigger, attr::TAB_ALIVE),
            classes: DropdownClasses::default(),
        })
    }

    /// Set automatic positioning.
    pub fn with_automatic_position(mut self, on: bool) -> Self {
        self.automatic_position = on;
        self
    }

    /// Set the focus target.
    pub fn with_focus_on_open(mut self, selector: Selector) -> Self {
        self.focus_on_open = Some(selector);
        self
    }

    /// Set the hover target.
    pub fn with_hover_on_open(mut self, selector: impl Into<String>) -> Self {
        self.hover_on_open = Some(selector.into());
        self
    }

    /// Set the instance identifier.
    pub fn with_drop_down_id(mut self, id: impl Into<String>) -> Self {
        self.drop_down_id = Some(id.into());
        self
    }

    /// Observe `tab-alive` on the trigger.
    pub fn with_tab_alive(mut self, on: bool) -> Self {
        self.tab_alive = on;
        self
    }

    /// Replace the class contract.
    pub fn with_classes(mut self, classes: DropdownClasses) -> Self {
        self.classes = classes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_element_tree::{Element, SelectorError};

    #[test]
    fn defaults_match_stylesheet_contract() {
        let classes = DropdownClasses::default();
        assert_eq!(classes.open, "drop-down-open");
        assert_eq!(classes.disabled, "disabled_element");
        assert_eq!(
            classes.handler_selector.as_str(),
            ".open-drop-down, .open_drop_down_for_workbasket"
        );
    }

    #[test]
    fn empty_values_count_as_absent() {
        let mut doc = Document::new();
        let trigger = doc.insert(
            Some(doc.body()),
            Element::new("button")
                .with_attribute(attr::FOCUS_ON_OPEN, "  ")
                .with_attribute(attr::DROP_DOWN_ID, "")
                .with_attribute(attr::TAB_ALIVE, ""),
        );
        let config = DropdownConfig::from_element(&doc, trigger).unwrap();
        assert!(config.focus_on_open.is_none());
        assert!(config.drop_down_id.is_none());
        assert!(config.tab_alive, "presence alone enables observation");
        assert!(!config.automatic_position);
    }

    #[test]
    fn invalid_focus_selector_is_reported() {
        let mut doc = Document::new();
        let trigger = doc.insert(
            Some(doc.body()),
            Element::new("button").with_attribute(attr::FOCUS_ON_OPEN, "li > a"),
        );
        let err = DropdownConfig::from_element(&doc, trigger).unwrap_err();
        assert!(matches!(
            err,
            DropdownError::InvalidSelector {
                attribute: attr::FOCUS_ON_OPEN,
                source: SelectorError::UnexpectedChar { ch: '>', .. },
            }
        ));
    }

    #[test]
    fn stale_trigger_is_rejected() {
        let mut doc = Document::new();
        let trigger = doc.insert(Some(doc.body()), Element::new("button"));
        doc.remove(trigger);
        assert_eq!(
            DropdownConfig::from_element(&doc, trigger).unwrap_err(),
            DropdownError::StaleElement(trigger)
        );
    }

    #[test]
    fn builders_set_fields() {
        let config = DropdownConfig::default()
            .with_automatic_position(true)
            .with_drop_down_id("a")
            .with_hover_on_open("li:first")
            .with_tab_alive(true);
        assert!(config.automatic_position);
        assert!(config.tab_alive);
        assert_eq!(config.drop_down_id.as_deref(), Some("a"));
        assert_eq!(config.hover_on_open.as_deref(), Some("li:first"));
    }
}
