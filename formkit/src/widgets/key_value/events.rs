//! Event handling for the KeyValue widget.

use serde::Deserialize;

use super::KeyValue;
use crate::events::{EventResult, Widget, WidgetEvent};

/// Messages understood by [`KeyValue`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyValueMsg {
    AddRow,
    DeleteRow(usize),
    DuplicateRow(usize),
    SetKey { index: usize, key: String },
    SetValue { index: usize, value: String },
    ClearAll,
    Validate,
    Blur,
    DragStart(usize),
    Drop(usize),
    DragEnd,
}

impl Widget for KeyValue {
    type Msg = KeyValueMsg;

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn update(&self, msg: KeyValueMsg) -> EventResult {
        match msg {
            KeyValueMsg::AddRow => {
                self.add_row();
                EventResult::Consumed
            }
            KeyValueMsg::DeleteRow(index) => {
                self.delete_row(index);
                EventResult::Consumed
            }
            KeyValueMsg::DuplicateRow(index) => {
                self.duplicate_row(index);
                EventResult::Consumed
            }
            KeyValueMsg::SetKey { index, key } => self.set_key(index, key),
            KeyValueMsg::SetValue { index, value } => self.set_value(index, value),
            KeyValueMsg::ClearAll => self.clear_all(),
            KeyValueMsg::Validate => {
                self.validate();
                EventResult::Consumed
            }
            KeyValueMsg::Blur => {
                self.blur();
                EventResult::Consumed
            }
            KeyValueMsg::DragStart(index) => self.drag_start(index),
            KeyValueMsg::Drop(index) => self.drop_on(index),
            KeyValueMsg::DragEnd => {
                self.drag_end();
                EventResult::Consumed
            }
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.is_state_dirty()
    }

    fn clear_dirty(&self) {
        self.clear_state_dirty();
    }
}

#[cfg(test)]
mod tests {
    use entangle::ModelLink;
    use serde_json::json;

    use super::*;
    use crate::widgets::key_value::KeyValueConfig;

    #[test]
    fn test_msg_from_json() {
        let msg: KeyValueMsg =
            serde_json::from_value(json!({ "set_key": { "index": 0, "key": "host" } })).unwrap();
        assert_eq!(
            msg,
            KeyValueMsg::SetKey {
                index: 0,
                key: "host".into()
            }
        );
    }

    #[test]
    fn test_events_follow_successful_edits() {
        let kv = KeyValue::new(KeyValueConfig::new(), ModelLink::detached()).unwrap();
        kv.mount();
        kv.update(KeyValueMsg::SetKey {
            index: 0,
            key: "a".into(),
        });
        kv.update(KeyValueMsg::DeleteRow(0));
        let events = kv.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].detail, json!({ "value": [{ "key": "a", "value": "" }] }));
    }
}
