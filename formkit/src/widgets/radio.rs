//! Radio group widget - exactly one of several options.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use entangle::{ConfigError, Entangled, ModelLink, Seed};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::class_names;

widget_id!(
    /// Unique identifier for a RadioGroup widget instance
    RadioGroupId,
    "radio_group"
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioDirection {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadioVariant {
    #[default]
    Default,
    Segmented,
    Cards,
    Pills,
}

/// One choice of a [`RadioGroup`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RadioOption {
    pub value: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Preselected when the group has no value.
    pub checked: bool,
    pub disabled: bool,
}

impl RadioOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Radio group configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RadioConfig {
    pub label: Option<String>,
    pub name: Option<String>,
    pub required: bool,
    pub error: Option<String>,
    pub direction: RadioDirection,
    pub variant: RadioVariant,
    pub disabled: bool,
    pub indicator: bool,
    pub options: Vec<RadioOption>,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            label: None,
            name: None,
            required: false,
            error: None,
            direction: RadioDirection::Vertical,
            variant: RadioVariant::Default,
            disabled: false,
            indicator: true,
            options: Vec::new(),
        }
    }
}

impl RadioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, option: RadioOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn variant(mut self, variant: RadioVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl WidgetConfig for RadioConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.value == option.value) {
                return Err(ConfigError::value(
                    "options",
                    format!("duplicate option value {:?}", option.value),
                ));
            }
        }
        Ok(())
    }
}

/// Messages understood by [`RadioGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioMsg {
    Select(String),
    Key(Key),
    Blur,
}

/// A group of mutually exclusive options with an optional selected value.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    id: RadioGroupId,
    config: Arc<RadioConfig>,
    component_id: String,
    selected: Entangled<Option<String>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl RadioGroup {
    pub fn new(config: RadioConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id: RadioGroupId::new(),
            config: Arc::new(config),
            component_id: format!("radio-group-{}", Uuid::new_v4().simple()),
            selected: Entangled::new(link),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> RadioGroupId {
        self.id
    }

    /// Seed from the bound value, then the first option marked `checked`.
    pub fn mount(&self) -> Seed {
        let preselected = self
            .config
            .options
            .iter()
            .find(|option| option.checked)
            .map(|option| Some(option.value.clone()));
        self.selected.initialize_with(preselected)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn selected(&self) -> Option<String> {
        self.selected.get()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.with(|selected| selected.as_deref() == Some(value))
    }

    pub fn options(&self) -> &[RadioOption] {
        &self.config.options
    }

    pub fn label_id(&self) -> Option<String> {
        self.config
            .label
            .as_ref()
            .map(|_| format!("{}-label", self.component_id))
    }

    /// Id of the native input backing `value`.
    pub fn input_id(&self, value: &str) -> String {
        format!("{}-{}", value, self.config.name.as_deref().unwrap_or_default())
    }

    pub fn group_classes(&self) -> String {
        let variant = self.config.variant;
        class_names(&[
            ("space-y-2", self.config.direction == RadioDirection::Vertical),
            ("flex gap-1 items-stretch", self.config.direction == RadioDirection::Horizontal),
            ("rounded-box w-fit p-1", variant == RadioVariant::Segmented),
            ("p-1", variant == RadioVariant::Cards),
        ])
    }

    /// Whether the native radio indicator is shown for this variant.
    pub fn shows_indicator(&self) -> bool {
        match self.config.variant {
            RadioVariant::Default => true,
            RadioVariant::Cards => self.config.indicator,
            RadioVariant::Segmented | RadioVariant::Pills => false,
        }
    }

    fn is_enabled(&self, option: &RadioOption) -> bool {
        !self.config.disabled && !option.disabled
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Select the option with `value`. Disabled and unknown options are ignored.
    pub fn select(&self, value: &str) -> EventResult {
        let Some(option) = self.config.options.iter().find(|o| o.value == value) else {
            log::debug!("{}: no option {:?}", self.id, value);
            return EventResult::Ignored;
        };
        if !self.is_enabled(option) || self.is_selected(value) {
            return EventResult::Ignored;
        }
        self.selected.set(Some(value.to_string()));
        self.events.push(WidgetEvent::change(self.id.to_string(), json!(value)));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// Select the next (or previous) enabled option, wrapping around.
    pub fn step(&self, forward: bool) -> EventResult {
        let options = &self.config.options;
        let len = options.len();
        if len == 0 {
            return EventResult::Ignored;
        }
        let current = self
            .selected()
            .and_then(|value| options.iter().position(|o| o.value == value));

        let start = match (current, forward) {
            (Some(i), true) => i + 1,
            (Some(i), false) => i + len - 1,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let offsets: Box<dyn Iterator<Item = usize>> = if forward {
            Box::new(0..len)
        } else {
            Box::new((0..len).map(|k| len - k))
        };
        let target = offsets
            .map(|k| (start + k) % len)
            .find(|&i| self.is_enabled(&options[i]));

        match target {
            Some(i) => {
                let value = options[i].value.clone();
                self.select(&value);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }
}

impl Widget for RadioGroup {
    type Msg = RadioMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: RadioMsg) -> EventResult {
        match msg {
            RadioMsg::Select(value) => self.select(&value),
            RadioMsg::Key(Key::ArrowDown) | RadioMsg::Key(Key::ArrowRight) => self.step(true),
            RadioMsg::Key(Key::ArrowUp) | RadioMsg::Key(Key::ArrowLeft) => self.step(false),
            RadioMsg::Key(_) => EventResult::Ignored,
            RadioMsg::Blur => {
                self.selected.sync();
                EventResult::Consumed
            }
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.selected.is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.selected.clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use entangle::Property;
    use serde_json::json;

    use super::*;

    fn plans() -> RadioConfig {
        RadioConfig::new()
            .name("plan")
            .option(RadioOption::new("free", "Free"))
            .option(RadioOption::new("pro", "Pro").disabled())
            .option(RadioOption::new("team", "Team"))
    }

    #[test]
    fn test_checked_option_seeds_unbound_group() {
        let group = RadioGroup::new(
            RadioConfig::new()
                .option(RadioOption::new("a", "A"))
                .option(RadioOption::new("b", "B").checked()),
            ModelLink::detached(),
        )
        .unwrap();
        assert_eq!(group.mount(), Seed::Default);
        assert_eq!(group.selected().as_deref(), Some("b"));
    }

    #[test]
    fn test_external_value_wins() {
        let property = Property::new(json!("team"));
        let group = RadioGroup::new(plans(), ModelLink::live("plan", &property)).unwrap();
        assert_eq!(group.mount(), Seed::External);
        assert!(group.is_selected("team"));
    }

    #[test]
    fn test_select_skips_disabled_and_unknown() {
        let group = RadioGroup::new(plans(), ModelLink::detached()).unwrap();
        group.mount();
        assert_eq!(group.select("pro"), EventResult::Ignored);
        assert_eq!(group.select("gold"), EventResult::Ignored);
        assert_eq!(group.select("free"), EventResult::Consumed);
        assert_eq!(group.select("free"), EventResult::Ignored);
        assert_eq!(group.drain_events().len(), 1);
    }

    #[test]
    fn test_arrows_skip_disabled_and_wrap() {
        let group = RadioGroup::new(plans(), ModelLink::detached()).unwrap();
        group.mount();
        group.update(RadioMsg::Key(Key::ArrowDown));
        assert_eq!(group.selected().as_deref(), Some("free"));
        group.update(RadioMsg::Key(Key::ArrowDown));
        assert_eq!(group.selected().as_deref(), Some("team"));
        group.update(RadioMsg::Key(Key::ArrowDown));
        assert_eq!(group.selected().as_deref(), Some("free"));
        group.update(RadioMsg::Key(Key::ArrowUp));
        assert_eq!(group.selected().as_deref(), Some("team"));
    }

    #[test]
    fn test_ids() {
        let group = RadioGroup::new(plans(), ModelLink::detached()).unwrap();
        assert_eq!(group.input_id("free"), "free-plan");
        assert_eq!(group.label_id(), None);
    }

    #[test]
    fn test_duplicate_option_values_rejected() {
        let config = RadioConfig::new()
            .option(RadioOption::new("a", "A"))
            .option(RadioOption::new("a", "Again"));
        assert!(RadioGroup::new(config, ModelLink::detached()).is_err());
    }

    #[test]
    fn test_variant_presentation() {
        let group =
            RadioGroup::new(plans().variant(RadioVariant::Segmented), ModelLink::detached()).unwrap();
        assert!(!group.shows_indicator());
        assert!(group.group_classes().contains("rounded-box"));
    }
}
