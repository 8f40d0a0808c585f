//! Checkbox widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{Entangled, ModelLink, Seed};
use serde::Deserialize;
use serde_json::json;

use super::group::CheckboxGroup;
use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;

widget_id!(
    /// Unique identifier for a Checkbox widget instance
    CheckboxId,
    "checkbox"
);

/// Checkbox configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CheckboxConfig {
    /// Form field name of the hidden native input.
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    /// Value contributed to a group (and to the form) when checked.
    pub value: Option<String>,
    /// Initially checked when no binding supplies a value.
    pub checked: bool,
    /// Initially indeterminate.
    pub indeterminate: bool,
    pub disabled: bool,
}

impl CheckboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
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

    pub fn indeterminate(mut self) -> Self {
        self.indeterminate = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl WidgetConfig for CheckboxConfig {}

/// Messages understood by [`Checkbox`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxMsg {
    /// Click on the visual checkbox or its label.
    Toggle,
    Key(Key),
    /// Set or clear the indeterminate state (usually from a parent).
    SetIndeterminate(bool),
}

#[derive(Debug, Default)]
struct CheckboxInner {
    indeterminate: bool,
    /// Checked state of the hidden native input used for form submission.
    mirror_checked: bool,
}

/// A checkbox with entangled checked state.
///
/// Standalone, the checked flag is its own [`Entangled<bool>`]. Inside a
/// [`CheckboxGroup`], the flag is derived from whether the checkbox's value is
/// a member of the group's sequence, and toggling edits that sequence.
///
/// # Example
///
/// ```ignore
/// let terms = Checkbox::new(CheckboxConfig::new().label("I accept"), ModelLink::detached());
/// terms.mount();
/// terms.update(CheckboxMsg::Toggle);
/// assert!(terms.is_checked());
/// ```
#[derive(Debug, Clone)]
pub struct Checkbox {
    id: CheckboxId,
    config: Arc<CheckboxConfig>,
    checked: Entangled<bool>,
    group: Option<CheckboxGroup>,
    inner: Arc<RwLock<CheckboxInner>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Checkbox {
    /// Create a standalone checkbox.
    pub fn new(config: CheckboxConfig, link: ModelLink) -> Self {
        Self::build(config, Entangled::new(link), None)
    }

    /// Create a checkbox whose state lives in `group`.
    pub fn in_group(config: CheckboxConfig, group: &CheckboxGroup) -> Self {
        if config.value.is_none() {
            log::warn!("Grouped checkbox without a value; it will toggle the empty string");
        }
        Self::build(config, Entangled::local(), Some(group.clone()))
    }

    fn build(config: CheckboxConfig, checked: Entangled<bool>, group: Option<CheckboxGroup>) -> Self {
        let indeterminate = config.indeterminate;
        Self {
            id: CheckboxId::new(),
            config: Arc::new(config),
            checked,
            group,
            inner: Arc::new(RwLock::new(CheckboxInner {
                indeterminate,
                mirror_checked: false,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        }
    }

    /// Get the unique ID for this checkbox
    pub fn id(&self) -> CheckboxId {
        self.id
    }

    /// Id of the hidden native input mirror.
    pub fn input_id(&self) -> String {
        format!("{}_input", self.id)
    }

    pub fn config(&self) -> &CheckboxConfig {
        &self.config
    }

    /// Seed the checked state. See [`mount_with_dom`](Self::mount_with_dom).
    pub fn mount(&self) -> Seed {
        self.mount_with_dom(None)
    }

    /// Seed the checked state once the host is mounted.
    ///
    /// Standalone order: bound model, the declared `checked` prop, then
    /// `dom_checked` (the native input's checked attribute). Grouped checkboxes
    /// derive their state from the group and ignore all three.
    pub fn mount_with_dom(&self, dom_checked: Option<bool>) -> Seed {
        let seed = if self.group.is_some() {
            Seed::External
        } else {
            let default = self.config.checked.then_some(true);
            self.checked.initialize(default, || dom_checked)
        };
        self.sync_mirror();
        seed
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Check if the checkbox is checked
    pub fn is_checked(&self) -> bool {
        match &self.group {
            Some(group) => group.is_checked(self.member_value()),
            None => self.checked.get(),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.indeterminate)
            .unwrap_or(false)
    }

    /// Checked state of the hidden native input.
    pub fn mirror_checked(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.mirror_checked)
            .unwrap_or(false)
    }

    /// Value submitted with the form, if checked.
    pub fn form_value(&self) -> Option<String> {
        self.is_checked()
            .then(|| self.config.value.clone().unwrap_or_else(|| "on".to_string()))
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    fn member_value(&self) -> &str {
        self.config.value.as_deref().unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Toggle the checked state, clearing any indeterminate state first.
    pub fn toggle(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }

        if let Ok(mut guard) = self.inner.write() {
            guard.indeterminate = false;
        }

        let changed = self.write_checked(!self.is_checked());
        self.sync_mirror();
        if changed {
            self.events
                .push(WidgetEvent::change(self.input_id(), json!(self.is_checked())));
        }
        EventResult::Consumed
    }

    /// Set the indeterminate state. Becoming indeterminate unchecks.
    pub fn set_indeterminate(&self, indeterminate: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.indeterminate = indeterminate;
        }
        if indeterminate && self.is_checked() {
            self.write_checked(false);
            self.sync_mirror();
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Returns whether the state now matches `checked`. A group at capacity
    /// refuses new members.
    fn write_checked(&self, checked: bool) -> bool {
        match &self.group {
            Some(group) => {
                group.set_member(self.member_value(), checked);
            }
            None => self.checked.set(checked),
        }
        self.dirty.store(true, Ordering::SeqCst);
        self.is_checked() == checked
    }

    fn sync_mirror(&self) {
        let checked = self.is_checked();
        if let Ok(mut guard) = self.inner.write() {
            guard.mirror_checked = checked;
        }
    }

    /// Flush a deferred binding (blur).
    pub fn sync(&self) -> bool {
        self.checked.sync()
    }
}

impl Widget for Checkbox {
    type Msg = CheckboxMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: CheckboxMsg) -> EventResult {
        match msg {
            CheckboxMsg::Toggle | CheckboxMsg::Key(Key::Space) | CheckboxMsg::Key(Key::Enter) => {
                self.toggle()
            }
            CheckboxMsg::Key(_) => EventResult::Ignored,
            CheckboxMsg::SetIndeterminate(value) => {
                self.set_indeterminate(value);
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
