//! Switch widget - a boolean toggle with a hidden form value.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use entangle::{Entangled, ModelLink, Seed};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::{IconSet, IconVariant, class_names};

widget_id!(
    /// Unique identifier for a Switch widget instance
    SwitchId,
    "switch"
);

/// Side of the label the switch sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchAlign {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl SwitchSize {
    fn track(self) -> &'static str {
        match self {
            SwitchSize::Sm => "h-4 w-7",
            SwitchSize::Md => "h-6 w-11",
            SwitchSize::Lg => "h-8 w-14",
        }
    }

    fn active_translate(self) -> &'static str {
        match self {
            SwitchSize::Sm => "translate-x-3",
            SwitchSize::Md => "translate-x-5",
            SwitchSize::Lg => "translate-x-6",
        }
    }
}

/// Switch configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SwitchConfig {
    pub label: String,
    /// Form field name. Without it no hidden input is rendered.
    pub name: Option<String>,
    pub description: Option<String>,
    pub disabled: bool,
    /// Initial state when unbound.
    #[serde(alias = "_checked")]
    pub checked: bool,
    pub align: SwitchAlign,
    pub size: SwitchSize,
    pub icon_on: Option<String>,
    pub icon_off: Option<String>,
}

impl SwitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

    pub fn size(mut self, size: SwitchSize) -> Self {
        self.size = size;
        self
    }

    pub fn icons(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.icon_on = Some(on.into());
        self.icon_off = Some(off.into());
        self
    }
}

impl WidgetConfig for SwitchConfig {}

/// Messages understood by [`Switch`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchMsg {
    /// Click on the track or the label.
    Toggle,
    Key(Key),
    Blur,
}

/// A boolean on/off switch.
#[derive(Debug, Clone)]
pub struct Switch {
    id: SwitchId,
    config: Arc<SwitchConfig>,
    /// DOM id shared by the control and its label.
    dom_id: String,
    checked: Entangled<bool>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Switch {
    pub fn new(config: SwitchConfig, link: ModelLink) -> Self {
        let dom_id = config
            .name
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            id: SwitchId::new(),
            config: Arc::new(config),
            dom_id,
            checked: Entangled::new(link),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    pub fn mount(&self) -> Seed {
        self.checked.initialize_with(Some(self.config.checked))
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Id of the label element referenced by `aria-labelledby`.
    pub fn label_id(&self) -> String {
        format!("{}-label", self.dom_id)
    }

    /// Hidden input value (`"1"`/`"0"`), present only for named switches.
    pub fn hidden_value(&self) -> Option<&'static str> {
        self.config
            .name
            .as_ref()
            .map(|_| if self.is_checked() { "1" } else { "0" })
    }

    pub fn track_classes(&self) -> String {
        let checked = self.is_checked();
        class_names(&[
            ("switch", true),
            (self.config.size.track(), true),
            ("is-on", checked),
            ("is-off", !checked),
            ("flex-row-reverse", self.config.align == SwitchAlign::Right),
        ])
    }

    pub fn thumb_classes(&self) -> String {
        let checked = self.is_checked();
        class_names(&[
            ("switch-thumb", true),
            (self.config.size.active_translate(), checked),
            ("translate-x-[0.05rem]", !checked),
        ])
    }

    /// Thumb icon for the current state.
    pub fn thumb_icon(&self, icons: &dyn IconSet) -> Option<String> {
        let name = if self.is_checked() {
            self.config.icon_on.as_deref()
        } else {
            self.config.icon_off.as_deref()
        }?;
        icons.resolve(name, IconVariant::Micro)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    pub fn toggle(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        let next = !self.is_checked();
        self.checked.set(next);
        self.events.push(WidgetEvent::change(self.id.to_string(), json!(next)));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }
}

impl Widget for Switch {
    type Msg = SwitchMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: SwitchMsg) -> EventResult {
        match msg {
            SwitchMsg::Toggle | SwitchMsg::Key(Key::Space) | SwitchMsg::Key(Key::Enter) => {
                self.toggle()
            }
            SwitchMsg::Key(_) => EventResult::Ignored,
            SwitchMsg::Blur => {
                self.checked.sync();
                EventResult::Consumed
            }
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.checked.is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.checked.clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use entangle::Property;
    use serde_json::json;

    use super::*;
    use crate::render::IconRegistry;

    #[test]
    fn test_toggle_writes_live() {
        let property = Property::new(json!(false));
        let switch = Switch::new(SwitchConfig::new(), ModelLink::live("notify", &property));
        switch.mount();
        switch.update(SwitchMsg::Toggle);
        switch.update(SwitchMsg::Key(Key::Space));
        assert_eq!(property.history(), vec![json!(true), json!(false)]);
        assert_eq!(switch.drain_events().len(), 2);
    }

    #[test]
    fn test_disabled_guard() {
        let switch = Switch::new(SwitchConfig::new().disabled(), ModelLink::detached());
        switch.mount();
        assert_eq!(switch.toggle(), EventResult::Ignored);
        assert!(!switch.is_checked());
    }

    #[test]
    fn test_hidden_value_requires_name() {
        let unnamed = Switch::new(SwitchConfig::new().checked(), ModelLink::detached());
        unnamed.mount();
        assert_eq!(unnamed.hidden_value(), None);

        let named = Switch::new(SwitchConfig::new().name("dark_mode"), ModelLink::detached());
        named.mount();
        assert_eq!(named.hidden_value(), Some("0"));
        named.toggle();
        assert_eq!(named.hidden_value(), Some("1"));
        assert_eq!(named.label_id(), "dark_mode-label");
    }

    #[test]
    fn test_unnamed_switch_gets_generated_dom_id() {
        let a = Switch::new(SwitchConfig::new(), ModelLink::detached());
        let b = Switch::new(SwitchConfig::new(), ModelLink::detached());
        assert_ne!(a.label_id(), b.label_id());
    }

    #[test]
    fn test_classes_follow_state() {
        let switch = Switch::new(SwitchConfig::new().size(SwitchSize::Lg), ModelLink::detached());
        switch.mount();
        assert!(switch.track_classes().contains("is-off"));
        switch.toggle();
        assert!(switch.track_classes().contains("is-on"));
        assert!(switch.thumb_classes().contains("translate-x-6"));
    }

    #[test]
    fn test_thumb_icon() {
        let icons = IconRegistry::new()
            .with("sun", IconVariant::Micro, "sun")
            .with("moon", IconVariant::Outline, "moon");
        let switch = Switch::new(SwitchConfig::new().icons("sun", "moon"), ModelLink::detached());
        switch.mount();
        assert_eq!(switch.thumb_icon(&icons).as_deref(), Some("moon"));
        switch.toggle();
        assert_eq!(switch.thumb_icon(&icons).as_deref(), Some("sun"));
    }

    #[test]
    fn test_config_accepts_prop_alias() {
        let config = SwitchConfig::from_json(json!({ "_checked": true, "size": "sm" })).unwrap();
        assert!(config.checked);
        assert_eq!(config.size, SwitchSize::Sm);
    }
}
