//! Widget event handling types and traits.
//!
//! Every widget consumes its own message type through a single
//! [`Widget::update`] state-transition function. Notifications meant for the
//! outside world (value changed, input complete) are queued on the widget and
//! drained by the embedder after each interaction.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Keys
// =============================================================================

/// Keyboard keys widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Char(char),
}

// =============================================================================
// Widget Event Types
// =============================================================================

/// Identifies which notification a widget produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetEventKind {
    /// Committed value changed (native-style `change`).
    Change,
    /// A fixed-length input reached its target length.
    Complete,
}

/// A notification dispatched by a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetEvent {
    /// Which kind of event
    pub kind: WidgetEventKind,
    /// Widget ID that triggered the event
    pub widget_id: String,
    /// Event payload (`{ "value": .. }`, `{ "code": .. }`)
    pub detail: Value,
}

impl WidgetEvent {
    /// Create a new widget event.
    pub fn new(kind: WidgetEventKind, widget_id: impl Into<String>, detail: Value) -> Self {
        Self {
            kind,
            widget_id: widget_id.into(),
            detail,
        }
    }

    /// A value-changed event carrying `{ "value": value }`.
    pub fn change(widget_id: impl Into<String>, value: Value) -> Self {
        Self::new(
            WidgetEventKind::Change,
            widget_id,
            serde_json::json!({ "value": value }),
        )
    }

    /// An input-complete event carrying `{ "code": code }`.
    pub fn complete(widget_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self::new(
            WidgetEventKind::Complete,
            widget_id,
            serde_json::json!({ "code": code.into() }),
        )
    }
}

/// Per-widget queue of dispatched events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<RwLock<Vec<WidgetEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn push(&self, event: WidgetEvent) {
        if let Ok(mut guard) = self.inner.write() {
            log::trace!("{:?} from {}", event.kind, event.widget_id);
            guard.push(event);
        }
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<WidgetEvent> {
        self.inner
            .write()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventResult {
    /// Message was ignored (disabled widget, unknown target, no-op).
    Ignored,
    /// Message was consumed.
    Consumed,
    /// Message started a drag operation on this widget.
    StartDrag,
}

impl EventResult {
    /// Check if the message was handled (consumed or started drag).
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

/// A widget driven by explicit messages.
pub trait Widget {
    /// Messages this widget understands.
    type Msg;

    /// DOM-style id of this instance.
    fn id_string(&self) -> String;

    /// Apply one message to local state.
    fn update(&self, msg: Self::Msg) -> EventResult;

    /// Take the events dispatched since the last drain.
    fn drain_events(&self) -> Vec<WidgetEvent>;

    /// Check if the widget state has changed since the last render.
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag.
    fn clear_dirty(&self);
}
