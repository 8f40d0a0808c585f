//! Event handling for the TagsInput widget.

use serde::Deserialize;

use super::TagsInput;
use crate::events::{EventResult, Key, Widget, WidgetEvent};

/// Messages understood by [`TagsInput`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagsMsg {
    /// The input's full value after an edit.
    Input(String),
    /// The input's full value after a paste.
    Paste(String),
    Key(Key),
    Focus,
    Blur,
    Remove(usize),
    RemoveValue(String),
    ClearAll,
    SelectSuggestion(usize),
    HideSuggestions,
    DragStart(usize),
    Drop(usize),
    DragEnd,
}

impl Widget for TagsInput {
    type Msg = TagsMsg;

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn update(&self, msg: TagsMsg) -> EventResult {
        match msg {
            TagsMsg::Input(value) => self.set_input(&value),
            TagsMsg::Paste(value) => self.paste(&value),
            TagsMsg::Key(key) => match key {
                Key::Enter => self.submit(),
                Key::ArrowDown => self.move_highlight(true),
                Key::ArrowUp => self.move_highlight(false),
                Key::Backspace => self.backspace(),
                Key::Escape => {
                    self.hide_suggestions();
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            },
            TagsMsg::Focus => {
                self.focus();
                EventResult::Consumed
            }
            TagsMsg::Blur => self.blur(),
            TagsMsg::Remove(index) => self.remove_tag(index),
            TagsMsg::RemoveValue(tag) => self.remove_value(&tag),
            TagsMsg::ClearAll => self.clear_all(),
            TagsMsg::SelectSuggestion(index) => self.select_suggestion(index),
            TagsMsg::HideSuggestions => {
                self.hide_suggestions();
                EventResult::Consumed
            }
            TagsMsg::DragStart(index) => self.drag_start(index),
            TagsMsg::Drop(index) => self.drop_on(index),
            TagsMsg::DragEnd => {
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
