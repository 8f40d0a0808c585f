//! Dropdown menu widget - a disclosure with action, checkbox and radio items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{ConfigError, Disclosure, DisclosureState, DismissReason};
use serde::Deserialize;
use serde_json::json;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::class_names;
use crate::widgets::popover::Placement;

widget_id!(
    /// Unique identifier for a Dropdown widget instance
    DropdownId,
    "dropdown"
);

/// What activating a menu item does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItemKind {
    /// Runs and closes the menu.
    #[default]
    Action,
    /// Toggles its own checked flag.
    Checkbox,
    /// Checks itself and unchecks the other radios sharing this name.
    Radio(String),
}

/// One entry of a [`Dropdown`] menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,
    /// Defaults to the trimmed label.
    pub value: Option<String>,
    pub kind: MenuItemKind,
    pub checked: bool,
    pub disabled: bool,
    pub icon: Option<String>,
    pub shortcut: Option<String>,
}

impl MenuItem {
    pub fn action(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn checkbox(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: MenuItemKind::Checkbox,
            ..Default::default()
        }
    }

    pub fn radio(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: MenuItemKind::Radio(name.into()),
            ..Default::default()
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn resolved_value(&self) -> String {
        self.value
            .clone()
            .unwrap_or_else(|| self.label.trim().to_string())
    }

    /// ARIA role of the item.
    pub fn role(&self) -> &'static str {
        match self.kind {
            MenuItemKind::Action => "menuitem",
            MenuItemKind::Checkbox => "menuitemcheckbox",
            MenuItemKind::Radio(_) => "menuitemradio",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DropdownConfig {
    pub position: Placement,
    pub items: Vec<MenuItem>,
}

impl DropdownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn position(mut self, position: Placement) -> Self {
        self.position = position;
        self
    }
}

impl WidgetConfig for DropdownConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for item in &self.items {
            if let MenuItemKind::Radio(name) = &item.kind
                && name.trim().is_empty()
            {
                return Err(ConfigError::value("items", "radio item without a group name"));
            }
        }
        Ok(())
    }
}

/// Messages understood by [`Dropdown`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownMsg {
    /// Click on the trigger.
    Toggle,
    ClickAway,
    /// Click on the item at this position.
    Activate(usize),
    /// Key pressed while the item at `index` has focus.
    Key { index: Option<usize>, key: Key },
}

#[derive(Debug)]
struct DropdownInner {
    disclosure: Disclosure,
    checked: Vec<bool>,
}

/// A menu anchored to a trigger.
#[derive(Debug, Clone)]
pub struct Dropdown {
    id: DropdownId,
    config: Arc<DropdownConfig>,
    inner: Arc<RwLock<DropdownInner>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Dropdown {
    pub fn new(config: DropdownConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let checked = config.items.iter().map(|item| item.checked).collect();
        Ok(Self {
            id: DropdownId::new(),
            config: Arc::new(config),
            inner: Arc::new(RwLock::new(DropdownInner {
                disclosure: Disclosure::new(),
                checked,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> DropdownId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn state(&self) -> DisclosureState {
        self.inner
            .read()
            .map(|guard| guard.disclosure.state())
            .unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.state() == DisclosureState::Open
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.config.items
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.checked.get(index).copied())
            .unwrap_or(false)
    }

    /// Values of every checked checkbox item.
    pub fn checked_values(&self) -> Vec<String> {
        self.config
            .items
            .iter()
            .enumerate()
            .filter(|(i, item)| item.kind == MenuItemKind::Checkbox && self.is_checked(*i))
            .map(|(_, item)| item.resolved_value())
            .collect()
    }

    /// Value of the checked radio in group `name`.
    pub fn radio_value(&self, name: &str) -> Option<String> {
        self.config
            .items
            .iter()
            .enumerate()
            .find(|(i, item)| {
                matches!(&item.kind, MenuItemKind::Radio(group) if group == name) && self.is_checked(*i)
            })
            .map(|(_, item)| item.resolved_value())
    }

    pub fn item_classes(&self, index: usize) -> String {
        let disabled = self.config.items.get(index).is_some_and(|item| item.disabled);
        class_names(&[
            ("dropdown-item", true),
            ("cursor-pointer", !disabled),
            ("opacity-50 cursor-not-allowed", disabled),
        ])
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    pub fn toggle(&self) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            guard.disclosure.toggle();
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    pub fn dismiss(&self, reason: DismissReason) -> EventResult {
        if let Ok(mut guard) = self.inner.write()
            && guard.disclosure.dismiss(reason)
        {
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// Activate the item at `index`.
    ///
    /// Actions close the menu, checkboxes flip, radios check exclusively in
    /// their group. A change event carrying the item value is dispatched.
    pub fn activate(&self, index: usize) -> EventResult {
        let Some(item) = self.config.items.get(index) else {
            return EventResult::Ignored;
        };
        if item.disabled {
            return EventResult::Ignored;
        }

        match &item.kind {
            MenuItemKind::Action => {
                self.dismiss(DismissReason::Selected);
            }
            MenuItemKind::Checkbox => {
                if let Ok(mut guard) = self.inner.write()
                    && let Some(flag) = guard.checked.get_mut(index)
                {
                    *flag = !*flag;
                }
            }
            MenuItemKind::Radio(name) => {
                if self.is_checked(index) {
                    return EventResult::Ignored;
                }
                if let Ok(mut guard) = self.inner.write() {
                    for (i, other) in self.config.items.iter().enumerate() {
                        if matches!(&other.kind, MenuItemKind::Radio(group) if group == name) {
                            guard.checked[i] = i == index;
                        }
                    }
                }
            }
        }

        log::debug!("{}: activated {:?}", self.id, item.label);
        self.events
            .push(WidgetEvent::change(self.id.to_string(), json!(item.resolved_value())));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }
}

impl Widget for Dropdown {
    type Msg = DropdownMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: DropdownMsg) -> EventResult {
        match msg {
            DropdownMsg::Toggle => self.toggle(),
            DropdownMsg::ClickAway => self.dismiss(DismissReason::ClickAway),
            DropdownMsg::Activate(index) => self.activate(index),
            DropdownMsg::Key { key: Key::Escape, .. } => self.dismiss(DismissReason::Escape),
            DropdownMsg::Key {
                index: Some(index),
                key: Key::Enter | Key::Space,
            } => self.activate(index),
            DropdownMsg::Key { .. } => EventResult::Ignored,
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn menu() -> Dropdown {
        Dropdown::new(
            DropdownConfig::new()
                .item(MenuItem::action(" Edit ").shortcut("E"))
                .item(MenuItem::action("Delete").disabled())
                .item(MenuItem::checkbox("Show grid"))
                .item(MenuItem::radio("size", "Small").checked())
                .item(MenuItem::radio("size", "Large")),
        )
        .unwrap()
    }

    #[test]
    fn test_action_closes_menu() {
        let dropdown = menu();
        dropdown.update(DropdownMsg::Toggle);
        assert!(dropdown.is_open());
        dropdown.update(DropdownMsg::Activate(0));
        assert!(!dropdown.is_open());
        assert_eq!(dropdown.drain_events()[0].detail, json!({ "value": "Edit" }));
    }

    #[test]
    fn test_disabled_item_ignored() {
        let dropdown = menu();
        assert_eq!(dropdown.activate(1), EventResult::Ignored);
        assert!(dropdown.drain_events().is_empty());
    }

    #[test]
    fn test_checkbox_item_toggles_and_stays_open() {
        let dropdown = menu();
        dropdown.toggle();
        dropdown.update(DropdownMsg::Key {
            index: Some(2),
            key: Key::Space,
        });
        assert!(dropdown.is_checked(2));
        assert!(dropdown.is_open());
        assert_eq!(dropdown.checked_values(), vec!["Show grid".to_string()]);
        dropdown.activate(2);
        assert!(dropdown.checked_values().is_empty());
    }

    #[test]
    fn test_radio_items_are_exclusive() {
        let dropdown = menu();
        assert_eq!(dropdown.radio_value("size").as_deref(), Some("Small"));
        dropdown.update(DropdownMsg::Key {
            index: Some(4),
            key: Key::Enter,
        });
        assert_eq!(dropdown.radio_value("size").as_deref(), Some("Large"));
        assert!(!dropdown.is_checked(3));
        assert_eq!(dropdown.activate(4), EventResult::Ignored);
    }

    #[test]
    fn test_escape_and_click_away() {
        let dropdown = menu();
        dropdown.toggle();
        dropdown.update(DropdownMsg::Key {
            index: None,
            key: Key::Escape,
        });
        assert!(!dropdown.is_open());
        dropdown.toggle();
        dropdown.update(DropdownMsg::ClickAway);
        assert_eq!(dropdown.state(), DisclosureState::Closed);
    }

    #[test]
    fn test_item_kinds_from_json() {
        let config = DropdownConfig::from_json(json!({
            "position": "bottom-end",
            "items": [
                { "label": "Copy" },
                { "label": "Wrap", "kind": "checkbox" },
                { "label": "Dark", "kind": { "radio": "theme" } }
            ]
        }))
        .unwrap();
        assert_eq!(config.items[2].kind, MenuItemKind::Radio("theme".into()));
        assert_eq!(config.items[1].role(), "menuitemcheckbox");
    }

    #[test]
    fn test_blank_radio_group_rejected() {
        assert!(Dropdown::new(DropdownConfig::new().item(MenuItem::radio(" ", "X"))).is_err());
    }
}
