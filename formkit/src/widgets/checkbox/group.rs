//! Checkbox group: a sequence of checked member values.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{Bounds, Entangled, Flash, ListMessages, ListState, ModelLink, Seed};
use serde::Deserialize;
use serde_json::json;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Widget, WidgetEvent};
use crate::id::widget_id;

widget_id!(
    /// Unique identifier for a CheckboxGroup widget instance
    CheckboxGroupId,
    "checkbox_group"
);

/// Checkbox group configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CheckboxGroupConfig {
    pub label: Option<String>,
    /// Values checked when no binding supplies any.
    pub checked: Vec<String>,
    /// Maximum number of checked members.
    pub max_checked: Option<usize>,
    pub max_checked_message: String,
    pub disabled: bool,
}

impl Default for CheckboxGroupConfig {
    fn default() -> Self {
        Self {
            label: None,
            checked: Vec::new(),
            max_checked: None,
            max_checked_message: "Maximum selections reached".to_string(),
            disabled: false,
        }
    }
}

impl CheckboxGroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checked<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checked = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_checked(mut self, max: usize) -> Self {
        self.max_checked = Some(max);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl WidgetConfig for CheckboxGroupConfig {}

/// Messages understood by [`CheckboxGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxGroupMsg {
    /// Toggle membership of a value.
    Toggle(String),
    /// Check or uncheck a value explicitly.
    Set { value: String, checked: bool },
}

/// Shared state for a set of grouped checkboxes.
///
/// The entangled value is the ordered list of checked member values. A member
/// is checked iff its value is in the list; toggling appends or filters it.
#[derive(Debug, Clone)]
pub struct CheckboxGroup {
    id: CheckboxGroupId,
    config: Arc<CheckboxGroupConfig>,
    list: ListState<String>,
    error: Arc<RwLock<Flash>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl CheckboxGroup {
    pub fn new(config: CheckboxGroupConfig, link: ModelLink) -> Self {
        let bounds = config.max_checked.map(Bounds::at_most).unwrap_or_default();
        let list = ListState::new(Entangled::new(link))
            .with_bounds(bounds)
            .with_messages(ListMessages {
                max_reached: config.max_checked_message.clone(),
                ..Default::default()
            });
        Self {
            id: CheckboxGroupId::new(),
            config: Arc::new(config),
            list,
            error: Arc::new(RwLock::new(Flash::new())),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        }
    }

    pub fn id(&self) -> CheckboxGroupId {
        self.id
    }

    /// Seed the checked values: bound model first, then `config.checked`.
    pub fn mount(&self) -> Seed {
        let default = (!self.config.checked.is_empty()).then(|| self.config.checked.clone());
        self.list.store().initialize_with(default)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Whether `value` is currently checked.
    pub fn is_checked(&self, value: &str) -> bool {
        self.list
            .store()
            .with(|items| items.iter().any(|item| item == value))
    }

    /// Checked values, in the order they were checked.
    pub fn values(&self) -> Vec<String> {
        self.list.items()
    }

    pub fn error(&self) -> Option<String> {
        self.error
            .read()
            .ok()
            .and_then(|guard| guard.message().map(String::from))
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Toggle membership of `value`.
    pub fn toggle(&self, value: &str) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        let result = self.list.toggle(value.to_string());
        self.finish(result.message())
    }

    /// Make `value` checked or unchecked. Returns `Ignored` when nothing changed.
    pub fn set_member(&self, value: &str, checked: bool) -> EventResult {
        if self.config.disabled || self.is_checked(value) == checked {
            return EventResult::Ignored;
        }
        self.toggle(value)
    }

    fn finish(&self, error: Option<&str>) -> EventResult {
        if let Some(msg) = error {
            if let Ok(mut guard) = self.error.write() {
                guard.show(msg);
            }
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        self.events
            .push(WidgetEvent::change(self.id.to_string(), json!(self.values())));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// Expire the capacity message.
    pub fn tick(&self, now: std::time::Instant) -> bool {
        let expired = self
            .error
            .write()
            .map(|mut guard| guard.tick(now))
            .unwrap_or(false);
        if expired {
            self.dirty.store(true, Ordering::SeqCst);
        }
        expired
    }

    /// Flush a deferred binding.
    pub fn sync(&self) -> bool {
        self.list.store().sync()
    }
}

impl Widget for CheckboxGroup {
    type Msg = CheckboxGroupMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: CheckboxGroupMsg) -> EventResult {
        match msg {
            CheckboxGroupMsg::Toggle(value) => self.toggle(&value),
            CheckboxGroupMsg::Set { value, checked } => self.set_member(&value, checked),
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.list.store().is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.list.store().clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use entangle::Property;
    use serde_json::json;

    use super::*;
    use crate::widgets::checkbox::{Checkbox, CheckboxConfig, CheckboxMsg};

    #[test]
    fn test_member_state_follows_bound_sequence() {
        let property = Property::new(json!(["email"]));
        let group = CheckboxGroup::new(CheckboxGroupConfig::new(), ModelLink::live("channels", &property));
        let email = Checkbox::in_group(CheckboxConfig::new().value("email"), &group);
        let sms = Checkbox::in_group(CheckboxConfig::new().value("sms"), &group);

        assert_eq!(group.mount(), Seed::External);
        email.mount();
        sms.mount();
        assert!(email.is_checked());
        assert!(!sms.is_checked());
    }

    #[test]
    fn test_member_toggle_appends_and_filters() {
        let property = Property::new(json!(["email"]));
        let group = CheckboxGroup::new(CheckboxGroupConfig::new(), ModelLink::live("channels", &property));
        group.mount();
        let email = Checkbox::in_group(CheckboxConfig::new().value("email"), &group);
        let sms = Checkbox::in_group(CheckboxConfig::new().value("sms"), &group);

        sms.update(CheckboxMsg::Toggle);
        email.update(CheckboxMsg::Toggle);
        assert_eq!(group.values(), vec!["sms".to_string()]);
        assert_eq!(property.history(), vec![json!(["email", "sms"]), json!(["sms"])]);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let group = CheckboxGroup::new(CheckboxGroupConfig::new().checked(["a"]), ModelLink::detached());
        group.mount();
        group.update(CheckboxGroupMsg::Toggle("b".into()));
        group.update(CheckboxGroupMsg::Toggle("b".into()));
        assert_eq!(group.values(), vec!["a".to_string()]);
        assert_eq!(group.drain_events().len(), 2);
    }

    #[test]
    fn test_max_checked_flashes_message() {
        let group = CheckboxGroup::new(
            CheckboxGroupConfig::new().checked(["a"]).max_checked(1),
            ModelLink::detached(),
        );
        group.mount();
        group.toggle("b");
        assert_eq!(group.values(), vec!["a".to_string()]);
        assert_eq!(group.error().as_deref(), Some("Maximum selections reached"));
        assert!(group.drain_events().is_empty());
    }

    #[test]
    fn test_set_member_is_idempotent() {
        let group = CheckboxGroup::new(CheckboxGroupConfig::new(), ModelLink::detached());
        group.mount();
        assert_eq!(group.set_member("x", true), EventResult::Consumed);
        assert_eq!(group.set_member("x", true), EventResult::Ignored);
        assert_eq!(group.values(), vec!["x".to_string()]);
    }
}
