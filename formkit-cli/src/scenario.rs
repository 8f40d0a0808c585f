//! JSON scenarios: build one widget, bind it, feed it messages, report.

use std::sync::Arc;

use entangle::{Binding, HostAttributes, ModelLink, Property, Seed};
use formkit::prelude::*;
use formkit::widgets::accordion::AccordionConfig;
use formkit::widgets::checkbox::CheckboxGroupConfig;
use formkit::widgets::dropdown::DropdownConfig;
use formkit::widgets::popover::PopoverConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Accordion,
    Checkbox,
    CheckboxGroup,
    Dropdown,
    KeyValue,
    Otp,
    Popover,
    Radio,
    Select,
    Slider,
    Switch,
    Tabs,
    Tags,
}

/// A scripted interaction with one widget.
///
/// ```json
/// {
///   "widget": "tags",
///   "config": { "maxTags": 3 },
///   "attrs": [["wire:model.live", "tags"]],
///   "model": [],
///   "steps": [{ "input": "rust," }, { "key": "backspace" }]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub widget: WidgetKind,
    /// Option bag using the component prop names.
    #[serde(default)]
    pub config: Value,
    /// Host attributes in declaration order.
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
    /// Initial external value. Absent means the property starts empty.
    #[serde(default)]
    pub model: Option<Value>,
    /// Widget messages, applied in order.
    #[serde(default)]
    pub steps: Vec<Value>,
}

/// What happened while running a [`Scenario`].
#[derive(Debug, Serialize)]
pub struct Report {
    pub widget: String,
    pub seed: Option<String>,
    pub results: Vec<EventResult>,
    pub events: Vec<WidgetEvent>,
    /// Every value written to the external property, oldest first.
    pub writes: Vec<Value>,
    pub model: Option<Value>,
    pub state: Value,
}

struct Outcome {
    widget: String,
    seed: Option<Seed>,
    results: Vec<EventResult>,
    events: Vec<WidgetEvent>,
    state: Value,
}

/// Run a scenario. With `strict`, hosts declaring several binding markers are
/// rejected instead of resolved first-wins.
pub fn run(scenario: Scenario, strict: bool) -> Result<Report, CliError> {
    let mut attrs = HostAttributes::new();
    for (key, value) in &scenario.attrs {
        attrs.push(key.as_str(), value.as_str());
    }
    let binding = if strict {
        Binding::resolve_strict(&attrs)?
    } else {
        Binding::resolve(&attrs)
    };
    log::debug!("binding resolved: {:?}", binding);

    let property = scenario.model.clone().map(Property::new).unwrap_or_else(Property::empty);
    let link = ModelLink::new(binding, Arc::new(property.clone()));
    let config = config_or_empty(scenario.config);
    let steps = scenario.steps;

    let outcome = match scenario.widget {
        WidgetKind::Accordion => {
            let w = Accordion::new(AccordionConfig::from_json(config)?);
            finish(&w, None, steps, |w| {
                json!({ "visible": (0..w.len()).filter(|&i| w.is_visible(i)).collect::<Vec<_>>() })
            })?
        }
        WidgetKind::Checkbox => {
            let w = Checkbox::new(CheckboxConfig::from_json(config)?, link);
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "checked": w.is_checked(), "indeterminate": w.is_indeterminate() })
            })?
        }
        WidgetKind::CheckboxGroup => {
            let w = CheckboxGroup::new(CheckboxGroupConfig::from_json(config)?, link);
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "values": w.values(), "error": w.error() })
            })?
        }
        WidgetKind::Dropdown => {
            let w = Dropdown::new(DropdownConfig::from_json(config)?)?;
            finish(&w, None, steps, |w| {
                json!({ "state": w.state(), "checked": w.checked_values() })
            })?
        }
        WidgetKind::KeyValue => {
            let w = KeyValue::new(KeyValueConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "rows": w.rows(), "error": w.error() })
            })?
        }
        WidgetKind::Otp => {
            let w = Otp::new(OtpConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "code": w.code(), "cells": w.cells(), "focused": w.focused() })
            })?
        }
        WidgetKind::Popover => {
            let w = Popover::new(PopoverConfig::from_json(config)?);
            finish(&w, None, steps, |w| json!({ "state": w.state() }))?
        }
        WidgetKind::Radio => {
            let w = RadioGroup::new(RadioConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| json!({ "selected": w.selected() }))?
        }
        WidgetKind::Select => {
            let w = Select::new(SelectConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "selection": w.selection(), "label": w.label(), "open": w.is_open() })
            })?
        }
        WidgetKind::Slider => {
            let w = Slider::new(SliderConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| json!({ "value": w.value() }))?
        }
        WidgetKind::Switch => {
            let w = Switch::new(SwitchConfig::from_json(config)?, link);
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| json!({ "checked": w.is_checked() }))?
        }
        WidgetKind::Tabs => {
            let w = Tabs::new(TabsConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| json!({ "active": w.active() }))?
        }
        WidgetKind::Tags => {
            let w = TagsInput::new(TagsConfig::from_json(config)?, link)?;
            let seed = w.mount();
            finish(&w, Some(seed), steps, |w| {
                json!({ "tags": w.tags(), "input": w.input(), "error": w.error() })
            })?
        }
    };

    Ok(Report {
        widget: outcome.widget,
        seed: outcome.seed.map(|seed| format!("{:?}", seed)),
        results: outcome.results,
        events: outcome.events,
        writes: property.history(),
        model: property.get(),
        state: outcome.state,
    })
}

/// Parse and validate a widget option bag.
pub fn check_config(kind: WidgetKind, config: Value) -> Result<(), CliError> {
    let config = config_or_empty(config);
    match kind {
        WidgetKind::Accordion => AccordionConfig::from_json(config).map(drop),
        WidgetKind::Checkbox => CheckboxConfig::from_json(config).map(drop),
        WidgetKind::CheckboxGroup => CheckboxGroupConfig::from_json(config).map(drop),
        WidgetKind::Dropdown => DropdownConfig::from_json(config).map(drop),
        WidgetKind::KeyValue => KeyValueConfig::from_json(config).map(drop),
        WidgetKind::Otp => OtpConfig::from_json(config).map(drop),
        WidgetKind::Popover => PopoverConfig::from_json(config).map(drop),
        WidgetKind::Radio => RadioConfig::from_json(config).map(drop),
        WidgetKind::Select => SelectConfig::from_json(config).map(drop),
        WidgetKind::Slider => SliderConfig::from_json(config).map(drop),
        WidgetKind::Switch => SwitchConfig::from_json(config).map(drop),
        WidgetKind::Tabs => TabsConfig::from_json(config).map(drop),
        WidgetKind::Tags => TagsConfig::from_json(config).map(drop),
    }?;
    Ok(())
}

fn config_or_empty(config: Value) -> Value {
    if config.is_null() { json!({}) } else { config }
}

fn finish<W>(
    widget: &W,
    seed: Option<Seed>,
    steps: Vec<Value>,
    state: impl FnOnce(&W) -> Value,
) -> Result<Outcome, CliError>
where
    W: Widget,
    W::Msg: DeserializeOwned,
{
    let results = drive(widget, steps)?;
    Ok(Outcome {
        widget: widget.id_string(),
        seed,
        results,
        events: widget.drain_events(),
        state: state(widget),
    })
}

fn drive<W>(widget: &W, steps: Vec<Value>) -> Result<Vec<EventResult>, CliError>
where
    W: Widget,
    W::Msg: DeserializeOwned,
{
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let msg: W::Msg =
                serde_json::from_value(step).map_err(|source| CliError::Step { index, source })?;
            let result = widget.update(msg);
            log::trace!("{} step {} -> {:?}", widget.id_string(), index, result);
            Ok(result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(value: Value) -> Scenario {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tags_scenario() {
        let report = run(
            scenario(json!({
                "widget": "tags",
                "config": { "maxTags": 3 },
                "attrs": [["wire:model.live", "tags"]],
                "model": [],
                "steps": [
                    { "input": "a," }, { "input": "A," }, { "input": "b," },
                    { "input": "c," }, { "input": "d," }
                ]
            })),
            false,
        )
        .unwrap();
        assert_eq!(report.model, Some(json!(["a", "b", "c"])));
        assert_eq!(report.state["error"], json!("Maximum tags reached"));
        assert_eq!(report.seed.as_deref(), Some("Empty"));
        assert_eq!(report.writes.len(), 3);
    }

    #[test]
    fn test_strict_rejects_conflicting_markers() {
        let conflicting = json!({
            "widget": "switch",
            "attrs": [["wire:model", "a"], ["x-model", "b"]]
        });
        assert!(matches!(
            run(scenario(conflicting.clone()), true),
            Err(CliError::Binding(_))
        ));
        assert!(run(scenario(conflicting), false).is_ok());
    }

    #[test]
    fn test_bad_step_reports_index() {
        let err = run(
            scenario(json!({ "widget": "popover", "steps": ["toggle", "explode"] })),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Step { index: 1, .. }));
    }

    #[test]
    fn test_otp_complete_event() {
        let report = run(
            scenario(json!({
                "widget": "otp",
                "config": { "length": 2 },
                "attrs": [["x-model", "code"]],
                "steps": [{ "paste": { "index": 0, "text": "42" } }]
            })),
            false,
        )
        .unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].kind, WidgetEventKind::Complete);
        assert_eq!(report.model, Some(json!("42")));
    }

    #[test]
    fn test_check_config() {
        assert!(check_config(WidgetKind::KeyValue, json!({ "minRows": 2 })).is_ok());
        assert!(check_config(WidgetKind::KeyValue, json!({ "minRowz": 2 })).is_err());
        assert!(check_config(WidgetKind::Slider, Value::Null).is_ok());
    }

    #[test]
    fn test_unknown_scenario_key_rejected() {
        let parsed: Result<Scenario, _> =
            serde_json::from_value(json!({ "widget": "tabs", "step": [] }));
        assert!(parsed.is_err());
    }
}
