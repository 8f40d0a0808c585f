//! Key-value editor widget state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use entangle::{
    ConfigError, DragTracker, Entangled, Flash, ListState, ModelLink, Seed, ValidationResult,
};
use serde_json::json;

use super::config::KeyValueConfig;
use super::row::Row;
use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, WidgetEvent};
use crate::id::widget_id;
use crate::render::class_names;

widget_id!(
    /// Unique identifier for a KeyValue widget instance
    KeyValueId,
    "key_value"
);

#[derive(Debug, Default)]
struct KeyValueInner {
    /// Rejections expire on their own; whole-state validation results stay
    /// until the next success.
    error: Flash,
    drag: DragTracker,
}

/// An editable list of key-value rows.
///
/// The row count stays within `min_rows..=max_rows`. Duplicate keys and blank
/// values are not rejected on entry; they are reported by
/// [`validate`](Self::validate) and the per-row predicates.
#[derive(Debug, Clone)]
pub struct KeyValue {
    id: KeyValueId,
    config: Arc<KeyValueConfig>,
    list: ListState<Row>,
    inner: Arc<RwLock<KeyValueInner>>,
    dirty: Arc<AtomicBool>,
    pub(super) events: EventQueue,
}

impl KeyValue {
    pub fn new(config: KeyValueConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        let list = ListState::new(Entangled::new(link))
            .with_bounds(config.bounds()?)
            .with_messages(config.list_messages());

        Ok(Self {
            id: KeyValueId::new(),
            config: Arc::new(config),
            list,
            inner: Arc::new(RwLock::new(KeyValueInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> KeyValueId {
        self.id
    }

    pub fn config(&self) -> &KeyValueConfig {
        &self.config
    }

    /// Seed rows from the bound model, then pad to `min_rows` with empty rows.
    ///
    /// Padding is a mutation and is written back through the binding.
    pub fn mount(&self) -> Seed {
        let seed = self.list.store().initialize_with(None);
        let rows = self.rows();
        if rows.len() < self.config.min_rows {
            let mut padded = rows;
            padded.resize(self.config.min_rows, Row::default());
            self.list.replace(padded);
        }
        seed
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn rows(&self) -> Vec<Row> {
        self.list.items()
    }

    pub fn row_count(&self) -> usize {
        self.list.len()
    }

    pub fn error(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.error.message().map(String::from))
    }

    pub fn can_add(&self) -> bool {
        !self.config.disabled && !self.list.is_full()
    }

    pub fn can_delete(&self) -> bool {
        !self.config.disabled && self.list.bounds().allows_remove(self.row_count())
    }

    pub fn dragging(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|guard| guard.drag.lifted())
    }

    /// Whether the row's trimmed key appears on another row.
    pub fn is_row_duplicate(&self, index: usize) -> bool {
        if !self.config.prevent_duplicate_keys {
            return false;
        }
        self.list.store().with(|rows| {
            let Some(key) = rows.get(index).map(Row::trimmed_key) else {
                return false;
            };
            !key.is_empty() && rows.iter().filter(|row| row.trimmed_key() == key).count() > 1
        })
    }

    /// Whether the row has a key but a blank value, when that is disallowed.
    pub fn is_row_value_empty(&self, index: usize) -> bool {
        if self.config.allow_empty_values {
            return false;
        }
        self.list
            .store()
            .with(|rows| rows.get(index).is_some_and(Row::has_empty_value))
    }

    /// Classes for the row at `index`.
    pub fn row_classes(&self, index: usize) -> String {
        class_names(&[
            ("key-value-row", true),
            ("opacity-50 scale-95", self.dragging() == Some(index)),
            ("is-duplicate", self.is_row_duplicate(index)),
            ("is-missing-value", self.is_row_value_empty(index)),
        ])
    }

    // -------------------------------------------------------------------------
    // Row operations
    // -------------------------------------------------------------------------

    /// Append an empty row.
    pub fn add_row(&self) -> ValidationResult {
        if self.config.disabled {
            return ValidationResult::Valid;
        }
        let result = self.list.add(Row::default());
        self.settle(&result);
        result
    }

    /// Delete the row at `index`. The minimum is checked before the index.
    pub fn delete_row(&self, index: usize) -> ValidationResult {
        if self.config.disabled {
            return ValidationResult::Valid;
        }
        if !self.list.bounds().allows_remove(self.row_count()) {
            let result = ValidationResult::invalid(self.list.messages().min_reached.clone());
            self.settle(&result);
            return result;
        }
        if index >= self.row_count() {
            return ValidationResult::Valid;
        }
        let result = self.list.remove(index);
        self.settle(&result);
        result
    }

    /// Insert a copy of the row at `index` right after it.
    ///
    /// A non-blank key gets a `_copy`, `_copy2`, ... suffix that no row uses.
    pub fn duplicate_row(&self, index: usize) -> ValidationResult {
        if self.config.disabled {
            return ValidationResult::Valid;
        }
        if self.list.is_full() {
            let result = ValidationResult::invalid(self.list.messages().max_reached.clone());
            self.settle(&result);
            return result;
        }
        let rows = self.rows();
        let Some(original) = rows.get(index) else {
            return ValidationResult::Valid;
        };

        let copy = Row::new(copy_key(&rows, &original.key), original.value.clone());
        let result = self.list.insert(index + 1, copy);
        self.settle(&result);
        result
    }

    pub fn set_key(&self, index: usize, key: impl Into<String>) -> EventResult {
        let key = key.into();
        self.edit(index, move |row| row.key = key)
    }

    pub fn set_value(&self, index: usize, value: impl Into<String>) -> EventResult {
        let value = value.into();
        self.edit(index, move |row| row.value = value)
    }

    fn edit(&self, index: usize, f: impl FnOnce(&mut Row)) -> EventResult {
        if self.config.disabled || index >= self.row_count() {
            return EventResult::Ignored;
        }
        self.list.store().update(|rows| {
            if let Some(row) = rows.get_mut(index) {
                f(row);
            }
        });
        self.settle(&ValidationResult::Valid);
        EventResult::Consumed
    }

    /// Reset to `min_rows` empty rows.
    pub fn clear_all(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        self.list
            .replace(vec![Row::default(); self.config.min_rows]);
        self.settle(&ValidationResult::Valid);
        EventResult::Consumed
    }

    /// Whole-state check: duplicate keys first, then blank values.
    ///
    /// The outcome replaces the shown message.
    pub fn validate(&self) -> ValidationResult {
        let rows = self.rows();
        let result = self.check_duplicates(&rows).and_then(|| self.check_values(&rows));
        if let Ok(mut guard) = self.inner.write() {
            match result.message() {
                Some(msg) => guard.error.pin(msg),
                None => guard.error.clear(),
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
        result
    }

    fn check_duplicates(&self, rows: &[Row]) -> ValidationResult {
        if !self.config.prevent_duplicate_keys {
            return ValidationResult::Valid;
        }
        let mut seen = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for key in rows.iter().map(Row::trimmed_key).filter(|k| !k.is_empty()) {
            if !seen.insert(key) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        if duplicates.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(format!("Duplicate keys found: {}", duplicates.join(", ")))
        }
    }

    fn check_values(&self, rows: &[Row]) -> ValidationResult {
        if !self.config.allow_empty_values && rows.iter().any(Row::has_empty_value) {
            ValidationResult::invalid("All keys must have corresponding values.")
        } else {
            ValidationResult::Valid
        }
    }

    /// Blur: validate and flush a deferred binding.
    pub fn blur(&self) -> ValidationResult {
        let result = self.validate();
        self.list.store().sync();
        result
    }

    // -------------------------------------------------------------------------
    // Drag reorder
    // -------------------------------------------------------------------------

    pub fn drag_start(&self, index: usize) -> EventResult {
        if !self.config.reorderable || self.config.disabled || index >= self.row_count() {
            return EventResult::Ignored;
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.drag.lift(index);
        }
        EventResult::StartDrag
    }

    pub fn drop_on(&self, target: usize) -> EventResult {
        let moved = self
            .inner
            .write()
            .ok()
            .and_then(|mut guard| guard.drag.drop_on(target));
        match moved {
            Some((from, to)) => {
                let result = self.list.reorder(from, to);
                self.settle(&result);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    pub fn drag_end(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.drag.end();
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Expire a rejection message whose deadline has passed.
    pub fn tick(&self, now: Instant) -> bool {
        let expired = self
            .inner
            .write()
            .map(|mut guard| guard.error.tick(now))
            .unwrap_or(false);
        if expired {
            self.dirty.store(true, Ordering::SeqCst);
        }
        expired
    }

    /// Flash a rejection, or clear the message and announce the change.
    fn settle(&self, result: &ValidationResult) {
        if let Ok(mut guard) = self.inner.write() {
            match result.message() {
                Some(msg) => guard.error.show(msg),
                None => guard.error.clear(),
            }
        }
        if result.ok() {
            self.changed();
        } else {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn changed(&self) {
        self.events
            .push(WidgetEvent::change(self.id.to_string(), json!(self.rows())));
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(super) fn is_state_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.list.store().is_dirty()
    }

    pub(super) fn clear_state_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.list.store().clear_dirty();
    }
}

/// `key_copy`, `key_copy2`, ... whichever is unused first. Blank keys are
/// copied as-is.
fn copy_key(rows: &[Row], key: &str) -> String {
    if key.trim().is_empty() {
        return key.to_string();
    }
    (1..)
        .map(|n| {
            if n > 1 {
                format!("{key}_copy{n}")
            } else {
                format!("{key}_copy")
            }
        })
        .find(|candidate| rows.iter().all(|row| row.key != *candidate))
        .unwrap_or_else(|| key.to_string())
}
