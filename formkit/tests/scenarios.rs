use std::sync::Arc;

use entangle::{Binding, HostAttributes, ModelLink, Property};
use formkit::prelude::*;
use formkit::widgets::tabs::TabsVariant;
use serde_json::json;

fn bind(attrs: &HostAttributes, property: &Property) -> ModelLink {
    ModelLink::new(Binding::resolve(attrs), Arc::new(property.clone()))
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_tags_capacity_and_case_insensitive_duplicates() {
    let property = Property::new(json!([]));
    let attrs = HostAttributes::new().with("wire:model.live", "tags");
    let tags = TagsInput::new(TagsConfig::new().max_tags(3), bind(&attrs, &property)).unwrap();
    tags.mount();

    let mut last = ValidationResult::Valid;
    for tag in ["a", "A", "b", "c", "d"] {
        last = tags.add_tag(tag);
    }

    assert_eq!(tags.tags(), vec!["a", "b", "c"]);
    assert_eq!(last.message(), Some("Maximum tags reached"));
    assert_eq!(tags.error().as_deref(), Some("Maximum tags reached"));
    assert_eq!(property.get(), Some(json!(["a", "b", "c"])));
}

#[test]
fn test_tags_typed_split_keys_commit() {
    let tags = TagsInput::new(TagsConfig::new(), ModelLink::detached()).unwrap();
    tags.mount();
    tags.update(TagsMsg::Input("rust,".into()));
    tags.update(TagsMsg::Paste("serde; log tokio".into()));
    assert_eq!(tags.tags(), vec!["rust", "serde", "log", "tokio"]);
    assert_eq!(tags.input(), "");
}

// ============================================================================
// Key-value
// ============================================================================

#[test]
fn test_key_value_refuses_to_drop_below_minimum() {
    let property = Property::new(json!([{ "key": "", "value": "" }]));
    let kv = KeyValue::new(KeyValueConfig::new().min_rows(1), ModelLink::live("pairs", &property))
        .unwrap();
    kv.mount();

    let result = kv.delete_row(0);
    assert_eq!(result.message(), Some("Minimum of 1 row(s) required."));
    assert_eq!(kv.row_count(), 1);
    assert_eq!(property.writes(), 0);
}

#[test]
fn test_key_value_deferred_edits_flush_on_blur() {
    let property = Property::empty();
    let attrs = HostAttributes::new().with("wire:model", "env");
    let kv = KeyValue::new(KeyValueConfig::new(), bind(&attrs, &property)).unwrap();
    kv.mount();
    kv.update(KeyValueMsg::SetKey {
        index: 0,
        key: "HOST".into(),
    });
    kv.update(KeyValueMsg::SetValue {
        index: 0,
        value: "localhost".into(),
    });
    assert_eq!(property.writes(), 0);

    kv.update(KeyValueMsg::Blur);
    assert_eq!(
        property.history(),
        vec![json!([{ "key": "HOST", "value": "localhost" }])]
    );
}

// ============================================================================
// Disclosure widgets
// ============================================================================

#[test]
fn test_popover_open_click_away_toggle_toggle() {
    let popover = Popover::new(Default::default());
    let mut states = Vec::new();
    for msg in [
        PopoverMsg::Open,
        PopoverMsg::ClickAway,
        PopoverMsg::Toggle,
        PopoverMsg::Toggle,
    ] {
        popover.update(msg);
        states.push(popover.state());
    }
    assert_eq!(
        states,
        vec![
            DisclosureState::Open,
            DisclosureState::Closed,
            DisclosureState::Open,
            DisclosureState::Closed,
        ]
    );
}

#[test]
fn test_single_select_closes_on_choice() {
    let select = Select::new(
        SelectConfig::new().options(["low", "high"]),
        ModelLink::detached(),
    )
    .unwrap();
    select.mount();
    select.update(SelectMsg::Toggle);
    assert!(select.is_open());
    select.update(SelectMsg::Select("high".into()));
    assert!(!select.is_open());
    assert_eq!(select.label(), "high");
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn test_multi_select_toggle_twice_restores_membership() {
    let property = Property::new(json!(["red"]));
    let select = Select::new(
        SelectConfig::new().options(["red", "green", "blue"]).multiple(),
        ModelLink::live("colors", &property),
    )
    .unwrap();
    select.mount();

    for value in ["green", "red"] {
        let before = select.is_selected(value);
        select.update(SelectMsg::Select(value.into()));
        select.update(SelectMsg::Select(value.into()));
        assert_eq!(select.is_selected(value), before);
    }
    assert_eq!(select.selection(), Selection::Many(vec!["red".into()]));
    assert_eq!(select.drain_events().len(), 4);
}

// ============================================================================
// OTP
// ============================================================================

#[test]
fn test_otp_completes_exactly_at_length() {
    let property = Property::empty();
    let otp = Otp::new(OtpConfig::new().length(4), ModelLink::live("code", &property)).unwrap();
    otp.mount();

    for (i, digit) in ["1", "2", "3"].iter().enumerate() {
        otp.update(OtpMsg::Input {
            index: i,
            value: digit.to_string(),
        });
    }
    let events = otp.drain_events();
    assert!(events.iter().all(|e| e.kind != WidgetEventKind::Complete));

    otp.update(OtpMsg::Input {
        index: 3,
        value: "4".into(),
    });
    let completes: Vec<_> = otp
        .drain_events()
        .into_iter()
        .filter(|e| e.kind == WidgetEventKind::Complete)
        .collect();
    assert_eq!(completes.len(), 1);
    assert_eq!(completes[0].detail, json!({ "code": "1234" }));
    assert_eq!(property.get(), Some(json!("1234")));
}

#[test]
fn test_otp_paste_fills_from_position() {
    let otp = Otp::new(OtpConfig::new().length(6), ModelLink::detached()).unwrap();
    otp.mount();
    otp.update(OtpMsg::Paste {
        index: 0,
        text: "12a3456789".into(),
    });
    assert_eq!(otp.code(), "123456");
    assert!(otp.is_complete());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_unknown_config_keys_are_rejected() {
    assert!(TagsConfig::from_json(json!({ "maxTags": 3, "maxTag": 3 })).is_err());
    assert!(KeyValueConfig::from_json(json!({ "minRows": 2, "rowz": 1 })).is_err());
    assert!(SelectConfig::from_json_str(r#"{ "multiple": true, "multi": true }"#).is_err());
    assert!(SwitchConfig::from_json(json!({ "checked": true })).is_ok());
}

#[test]
fn test_config_prop_names_are_camel_case() {
    let config = TabsConfig::from_json(json!({
        "variant": "pills",
        "activeTab": 1,
        "tabs": [{ "label": "One" }, { "label": "Two" }]
    }))
    .unwrap();
    assert_eq!(config.variant, TabsVariant::Pills);
    assert_eq!(config.active_tab, Some(TabKey::Index(1)));
}

// ============================================================================
// Checkbox group
// ============================================================================

#[test]
fn test_group_members_follow_the_group() {
    let property = Property::new(json!(["email"]));
    let group = CheckboxGroup::new(Default::default(), ModelLink::live("channels", &property));
    group.mount();
    let email = Checkbox::in_group(CheckboxConfig::new().value("email"), &group);
    let sms = Checkbox::in_group(CheckboxConfig::new().value("sms"), &group);
    email.mount();
    sms.mount();

    assert!(email.is_checked());
    sms.update(CheckboxMsg::Toggle);
    assert!(group.is_checked("sms"));
    assert_eq!(property.get(), Some(json!(["email", "sms"])));
}
