//! Popover widget - an anchored overlay dismissed by click-away or escape.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{Disclosure, DisclosureState, DismissReason};
use serde::Deserialize;

use crate::config::WidgetConfig;
use crate::events::{EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;

widget_id!(
    /// Unique identifier for a Popover widget instance
    PopoverId,
    "popover"
);

/// Placement of the overlay relative to its trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    Right,
}

impl Placement {
    /// Anchor directive suffix, e.g. `bottom-start`.
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
            Placement::Bottom => "bottom",
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::Left => "left",
            Placement::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PopoverConfig {
    pub position: Placement,
    /// Gap between trigger and overlay, in pixels.
    pub offset: u32,
}

impl Default for PopoverConfig {
    fn default() -> Self {
        Self {
            position: Placement::Bottom,
            offset: 3,
        }
    }
}

impl PopoverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Placement) -> Self {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

impl WidgetConfig for PopoverConfig {}

/// Messages understood by [`Popover`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopoverMsg {
    /// Click on the trigger.
    Toggle,
    Open,
    Close,
    /// A click landed outside the overlay.
    ClickAway,
    Key(Key),
}

#[derive(Debug, Clone)]
pub struct Popover {
    id: PopoverId,
    config: Arc<PopoverConfig>,
    disclosure: Arc<RwLock<Disclosure>>,
    dirty: Arc<AtomicBool>,
}

impl Popover {
    pub fn new(config: PopoverConfig) -> Self {
        Self {
            id: PopoverId::new(),
            config: Arc::new(config),
            disclosure: Arc::new(RwLock::new(Disclosure::new())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> PopoverId {
        self.id
    }

    pub fn state(&self) -> DisclosureState {
        self.disclosure
            .read()
            .map(|guard| guard.state())
            .unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.state() == DisclosureState::Open
    }

    /// Anchor directive for the overlay, e.g. `bottom.offset.3`.
    pub fn anchor(&self) -> String {
        format!("{}.offset.{}", self.config.position.as_str(), self.config.offset)
    }

    fn with_disclosure(&self, f: impl FnOnce(&mut Disclosure) -> bool) -> EventResult {
        if let Ok(mut guard) = self.disclosure.write()
            && f(&mut guard)
        {
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }
}

impl Widget for Popover {
    type Msg = PopoverMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: PopoverMsg) -> EventResult {
        match msg {
            PopoverMsg::Toggle => self.with_disclosure(|d| {
                d.toggle();
                true
            }),
            PopoverMsg::Open => self.with_disclosure(Disclosure::open),
            PopoverMsg::Close => self.with_disclosure(Disclosure::close),
            PopoverMsg::ClickAway => self.with_disclosure(|d| d.dismiss(DismissReason::ClickAway)),
            PopoverMsg::Key(Key::Escape) => self.with_disclosure(|d| d.dismiss(DismissReason::Escape)),
            PopoverMsg::Key(_) => EventResult::Ignored,
        }
    }

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

    #[test]
    fn test_escape_and_click_away_dismiss() {
        let popover = Popover::new(PopoverConfig::new());
        popover.update(PopoverMsg::Toggle);
        assert!(popover.is_open());
        assert_eq!(popover.update(PopoverMsg::Key(Key::Escape)), EventResult::Consumed);
        assert!(!popover.is_open());
        assert_eq!(popover.update(PopoverMsg::ClickAway), EventResult::Ignored);

        popover.update(PopoverMsg::Open);
        popover.update(PopoverMsg::ClickAway);
        assert!(!popover.is_open());
    }

    #[test]
    fn test_dirty_only_on_change() {
        let popover = Popover::new(PopoverConfig::new());
        popover.update(PopoverMsg::Close);
        assert!(!popover.is_dirty());
        popover.update(PopoverMsg::Open);
        assert!(popover.is_dirty());
    }

    #[test]
    fn test_anchor() {
        let popover = Popover::new(PopoverConfig::new().position(Placement::TopEnd).offset(8));
        assert_eq!(popover.anchor(), "top-end.offset.8");
    }
}
