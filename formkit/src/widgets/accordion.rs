//! Accordion widget - stacked disclosures with at most one open item.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{Disclosure, DisclosureState};
use serde::Deserialize;

use crate::config::WidgetConfig;
use crate::events::{EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::{IconSet, IconVariant, class_names};

widget_id!(
    /// Unique identifier for an Accordion widget instance
    AccordionId,
    "accordion_group"
);

widget_id!(
    /// Unique identifier for a single accordion item
    AccordionItemId,
    "accordion"
);

/// One collapsible section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AccordionItemConfig {
    pub trigger: String,
    /// Open at mount. When several items set it, the last one wins.
    pub expanded: bool,
    /// A disabled item never opens.
    pub disabled: bool,
}

impl AccordionItemConfig {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            ..Default::default()
        }
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Accordion configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AccordionConfig {
    /// Put the chevron before the trigger text.
    pub reverse: bool,
    pub items: Vec<AccordionItemConfig>,
}

impl AccordionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, item: AccordionItemConfig) -> Self {
        self.items.push(item);
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

impl WidgetConfig for AccordionConfig {}

/// Messages understood by [`Accordion`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccordionMsg {
    /// Click on the trigger of the item at this position.
    Toggle(usize),
    /// Key pressed on the trigger of the item at this position.
    Key { index: usize, key: Key },
}

#[derive(Debug)]
struct AccordionItem {
    id: AccordionItemId,
    config: AccordionItemConfig,
    disclosure: Disclosure,
}

#[derive(Debug)]
struct AccordionInner {
    items: Vec<AccordionItem>,
}

/// A group of collapsible items sharing one active slot.
#[derive(Debug, Clone)]
pub struct Accordion {
    id: AccordionId,
    reverse: bool,
    inner: Arc<RwLock<AccordionInner>>,
    dirty: Arc<AtomicBool>,
}

impl Accordion {
    pub fn new(config: AccordionConfig) -> Self {
        let mut items: Vec<AccordionItem> = config
            .items
            .into_iter()
            .map(|config| AccordionItem {
                id: AccordionItemId::new(),
                config,
                disclosure: Disclosure::new(),
            })
            .collect();

        if let Some(item) = items.iter_mut().rev().find(|item| item.config.expanded) {
            item.disclosure.open();
        }

        Self {
            id: AccordionId::new(),
            reverse: config.reverse,
            inner: Arc::new(RwLock::new(AccordionInner { items })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> AccordionId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn item_ids(&self) -> Vec<AccordionItemId> {
        self.inner
            .read()
            .map(|guard| guard.items.iter().map(|item| item.id).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item currently holding the active slot.
    pub fn active(&self) -> Option<AccordionItemId> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.items.iter().find(|i| i.disclosure.is_open()).map(|i| i.id))
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .items
                    .get(index)
                    .map(|item| item.disclosure.is_open() && !item.config.disabled)
            })
            .unwrap_or(false)
    }

    pub fn state(&self, index: usize) -> DisclosureState {
        if self.is_visible(index) {
            DisclosureState::Open
        } else {
            DisclosureState::Closed
        }
    }

    pub fn item_classes(&self, index: usize) -> String {
        let disabled = self
            .inner
            .read()
            .ok()
            .and_then(|guard| guard.items.get(index).map(|item| item.config.disabled))
            .unwrap_or(false);
        class_names(&[("accordion-item", true), ("opacity-50", disabled)])
    }

    pub fn trigger_classes(&self) -> String {
        class_names(&[("accordion-trigger", true), ("flex-row-reverse", self.reverse)])
    }

    /// Chevron pointing up when open, down when closed.
    pub fn trigger_icon(&self, index: usize, icons: &dyn IconSet) -> Option<String> {
        let name = if self.is_visible(index) {
            "chevron-up"
        } else {
            "chevron-down"
        };
        icons.resolve(name, IconVariant::Outline)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Flip the item at `index`. Opening it closes whichever item was open.
    pub fn toggle(&self, index: usize) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            let Some(item) = guard.items.get(index) else {
                return EventResult::Ignored;
            };
            if item.config.disabled {
                return EventResult::Ignored;
            }
            let opening = !item.disclosure.is_open();
            for (i, item) in guard.items.iter_mut().enumerate() {
                if i == index {
                    item.disclosure.toggle();
                } else if opening {
                    item.disclosure.close();
                }
            }
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// Flip the item with `id`.
    pub fn toggle_item(&self, id: AccordionItemId) -> EventResult {
        match self.item_ids().iter().position(|item| *item == id) {
            Some(index) => self.toggle(index),
            None => EventResult::Ignored,
        }
    }
}

impl Widget for Accordion {
    type Msg = AccordionMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: AccordionMsg) -> EventResult {
        match msg {
            AccordionMsg::Toggle(index) => self.toggle(index),
            AccordionMsg::Key {
                index,
                key: Key::Enter | Key::Space,
            } => self.toggle(index),
            AccordionMsg::Key { .. } => EventResult::Ignored,
        }
    }

    /// Accordions dispatch nothing.
    fn drain_events(&self) -> Vec<WidgetEvent> {
        Vec::new()
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
    use super::*;
    use crate::render::IconRegistry;

    fn faq() -> AccordionConfig {
        AccordionConfig::new()
            .item(AccordionItemConfig::new("Shipping"))
            .item(AccordionItemConfig::new("Returns").expanded())
            .item(AccordionItemConfig::new("Legacy").disabled().expanded())
    }

    #[test]
    fn test_disabled_expanded_item_is_never_visible() {
        let accordion = Accordion::new(faq());
        assert!(accordion.active().is_some());
        assert!(!accordion.is_visible(2));
        assert!(!accordion.is_visible(1));
    }

    #[test]
    fn test_single_active_item() {
        let accordion = Accordion::new(faq());
        accordion.toggle(0);
        accordion.toggle(1);
        assert!(!accordion.is_visible(0));
        assert!(accordion.is_visible(1));
        accordion.toggle(1);
        assert_eq!(accordion.active(), None);
    }

    #[test]
    fn test_disabled_toggle_ignored() {
        let accordion = Accordion::new(faq());
        assert_eq!(accordion.toggle(2), EventResult::Ignored);
        assert_eq!(accordion.toggle(9), EventResult::Ignored);
    }

    #[test]
    fn test_toggle_by_item_id() {
        let accordion = Accordion::new(AccordionConfig::new().item(AccordionItemConfig::new("One")));
        let id = accordion.item_ids()[0];
        assert!(id.to_string().starts_with("__accordion_"));
        accordion.toggle_item(id);
        assert_eq!(accordion.active(), Some(id));
        assert_eq!(accordion.state(0), DisclosureState::Open);
    }

    #[test]
    fn test_keyboard_and_icons() {
        let icons = IconRegistry::new()
            .with("chevron-up", IconVariant::Outline, "up")
            .with("chevron-down", IconVariant::Outline, "down");
        let accordion = Accordion::new(AccordionConfig::new().item(AccordionItemConfig::new("One")));
        assert_eq!(accordion.trigger_icon(0, &icons).as_deref(), Some("down"));
        accordion.update(AccordionMsg::Key {
            index: 0,
            key: Key::Enter,
        });
        assert_eq!(accordion.trigger_icon(0, &icons).as_deref(), Some("up"));
    }
}
