//! Event handling for the Select widget.

use entangle::DismissReason;
use serde::Deserialize;

use super::Select;
use crate::events::{EventResult, Key, Widget, WidgetEvent};

/// Messages understood by [`Select`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectMsg {
    /// Click on the trigger.
    Toggle,
    ClickAway,
    Search(String),
    /// Click on the option with this value.
    Select(String),
    /// Pointer entered the option with this value.
    Hover(String),
    Clear,
    Key(Key),
    Blur,
}

impl Select {
    /// Keyboard navigation over the virtual highlight.
    fn handle_key(&self, key: Key) -> EventResult {
        let len = self.filtered_len();
        let active = self.active_index();
        match key {
            Key::ArrowDown if len > 0 => {
                let next = match active {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.set_active(Some(next));
                EventResult::Consumed
            }
            Key::ArrowUp if len > 0 => {
                let next = match active {
                    Some(i) if i > 0 => i - 1,
                    _ => len - 1,
                };
                self.set_active(Some(next));
                EventResult::Consumed
            }
            Key::Home if len > 0 => self.set_active(Some(0)),
            Key::End if len > 0 => self.set_active(Some(len - 1)),
            Key::Enter => match active.and_then(|i| self.filtered_value(i)) {
                Some(value) => self.select_logged(&value),
                None => EventResult::Ignored,
            },
            Key::Escape => self.dismiss(DismissReason::Escape),
            _ => EventResult::Ignored,
        }
    }

    fn select_logged(&self, value: &str) -> EventResult {
        match self.select(value) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{}", e);
                EventResult::Ignored
            }
        }
    }
}

impl Widget for Select {
    type Msg = SelectMsg;

    fn id_string(&self) -> String {
        self.id().to_string()
    }

    fn update(&self, msg: SelectMsg) -> EventResult {
        match msg {
            SelectMsg::Toggle => self.toggle(),
            SelectMsg::ClickAway => self.dismiss(DismissReason::ClickAway),
            SelectMsg::Search(query) => self.set_search(query),
            SelectMsg::Select(value) => self.select_logged(&value),
            SelectMsg::Hover(value) => self.hover(&value),
            SelectMsg::Clear => self.clear(),
            SelectMsg::Key(key) => self.handle_key(key),
            SelectMsg::Blur => {
                self.sync();
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
    use entangle::{ModelLink, Property};
    use serde_json::json;

    use super::*;
    use crate::widgets::select::{SearchMode, SelectConfig, Selection};

    fn colors() -> Select {
        let select = Select::new(
            SelectConfig::new().options(["red", "green", "blue"]),
            ModelLink::detached(),
        )
        .unwrap();
        select.mount();
        select
    }

    #[test]
    fn test_arrows_wrap() {
        let select = colors();
        select.update(SelectMsg::Toggle);
        select.update(SelectMsg::Key(Key::ArrowDown));
        assert_eq!(select.active_index(), Some(0));
        select.update(SelectMsg::Key(Key::ArrowUp));
        assert_eq!(select.active_index(), Some(2));
        select.update(SelectMsg::Key(Key::ArrowDown));
        assert_eq!(select.active_index(), Some(0));
        select.update(SelectMsg::Key(Key::End));
        assert_eq!(select.active_index(), Some(2));
        select.update(SelectMsg::Key(Key::Home));
        assert_eq!(select.active_index(), Some(0));
    }

    #[test]
    fn test_enter_selects_highlight() {
        let select = colors();
        select.update(SelectMsg::Toggle);
        select.update(SelectMsg::Hover("green".into()));
        assert!(select.is_focused("green"));
        select.update(SelectMsg::Key(Key::Enter));
        assert_eq!(select.selection(), Selection::One(Some("green".into())));
        assert!(!select.is_open());
    }

    #[test]
    fn test_enter_without_highlight_ignored() {
        let select = colors();
        assert_eq!(select.update(SelectMsg::Key(Key::Enter)), EventResult::Ignored);
    }

    #[test]
    fn test_mismatch_is_skipped() {
        let property = Property::new(json!("red"));
        let select = Select::new(
            SelectConfig::new().options(["red", "green"]).multiple(),
            ModelLink::live("colors", &property),
        )
        .unwrap();
        select.mount();
        assert_eq!(select.update(SelectMsg::Select("green".into())), EventResult::Ignored);
        assert!(select.drain_events().is_empty());
    }

    #[test]
    fn test_fuzzy_search_highlight_indexes_filtered_list() {
        let select = Select::new(
            SelectConfig::new()
                .options(["alpha", "beta", "gamma"])
                .searchable(SearchMode::Fuzzy),
            ModelLink::detached(),
        )
        .unwrap();
        select.mount();
        select.update(SelectMsg::Toggle);
        select.update(SelectMsg::Search("gm".into()));
        select.update(SelectMsg::Key(Key::Enter));
        assert_eq!(select.selection(), Selection::One(Some("gamma".into())));
    }

    #[test]
    fn test_deferred_selection_flushes_on_blur() {
        let property = Property::empty();
        let select = Select::new(
            SelectConfig::new().options(["red"]),
            ModelLink::deferred("color", &property),
        )
        .unwrap();
        select.mount();
        select.update(SelectMsg::Select("red".into()));
        assert_eq!(property.writes(), 0);
        select.update(SelectMsg::Blur);
        assert_eq!(property.history(), vec![json!("red")]);
    }

    #[test]
    fn test_msg_from_json() {
        let msg: SelectMsg = serde_json::from_value(json!({ "select": "red" })).unwrap();
        assert_eq!(msg, SelectMsg::Select("red".into()));
    }
}
